use anyhow::{Context, Result};
use serde::Serialize;
use std::{collections::HashMap, convert::Infallible, net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use warp::{
    http::{header::CONTENT_TYPE, StatusCode},
    reject::Rejection,
    reply::{Reply, Response},
    Filter,
};

use crate::{
    dashboard::Dashboard,
    page::{render_data_panel, ChartKind, PageAssembler, PanelToggles},
};

pub const SERVICE_NAME: &str = "gasdash";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

fn error_reply(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        details,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

fn json_text(body: &str) -> Response {
    warp::reply::with_header(body.to_string(), CONTENT_TYPE, "application/json").into_response()
}

fn unknown_chart(name: &str) -> Response {
    warn!(chart = name, "request for unknown chart");
    error_reply(
        StatusCode::NOT_FOUND,
        "Unknown chart",
        Some(format!(
            "`{name}` is not one of {}",
            ChartKind::ALL.map(|k| k.as_str()).join(", ")
        )),
    )
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME
    })))
}

async fn page(query: HashMap<String, String>, dash: Arc<Dashboard>) -> Result<Response, Rejection> {
    let toggles = PanelToggles::from_query(query.get("show").map(String::as_str));
    let html = PageAssembler::live(&dash).render(toggles);
    Ok(warp::reply::html(html).into_response())
}

async fn figure(name: String, dash: Arc<Dashboard>) -> Result<Response, Rejection> {
    Ok(match ChartKind::parse(&name) {
        Some(kind) => json_text(dash.figure_json(kind)),
        None => unknown_chart(&name),
    })
}

async fn data_panel(name: String, dash: Arc<Dashboard>) -> Result<Response, Rejection> {
    Ok(match ChartKind::parse(&name) {
        Some(kind) => warp::reply::html(render_data_panel(dash.table(kind))).into_response(),
        None => unknown_chart(&name),
    })
}

async fn animation(dash: Arc<Dashboard>) -> Result<Response, Rejection> {
    Ok(json_text(dash.animation_json()))
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        warn!("no route matched");
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not found", None));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        warn!("method not allowed");
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None));
    }
    warn!(?err, "unhandled rejection");
    Ok(error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal error",
        Some(format!("{err:?}")),
    ))
}

fn with_dashboard(
    dash: Arc<Dashboard>,
) -> impl Filter<Extract = (Arc<Dashboard>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&dash))
}

/// Every route, sharing one dashboard.
pub fn routes(
    dash: Arc<Dashboard>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_dashboard(Arc::clone(&dash)))
        .and_then(page);

    let figures = warp::path!("figures" / String)
        .and(warp::get())
        .and(with_dashboard(Arc::clone(&dash)))
        .and_then(figure);

    let panels = warp::path!("panels" / String / "data")
        .and(warp::get())
        .and(with_dashboard(Arc::clone(&dash)))
        .and_then(data_panel);

    let asset = warp::path!("assets" / "fuel_pump.json")
        .and(warp::get())
        .and(with_dashboard(dash))
        .and_then(animation);

    let health = warp::path!("health").and(warp::get()).and_then(health_check);

    index
        .or(figures)
        .or(panels)
        .or(asset)
        .or(health)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Serve until ctrl-c.
pub async fn serve(dash: Arc<Dashboard>, addr: SocketAddr) -> Result<()> {
    let (bound, server) = warp::serve(routes(dash))
        .try_bind_with_graceful_shutdown(addr, async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("could not listen for ctrl-c");
            }
        })
        .with_context(|| format!("binding {addr}"))?;

    info!(%bound, "server listening");
    info!("page: http://{bound}/");
    info!("health check: http://{bound}/health");
    server.await;
    info!("server stopped");
    Ok(())
}
