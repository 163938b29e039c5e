use crate::data::{ChoroplethTable, LineChartTable, ScatterTable};

/// A table that can be shown as a raw data panel.
pub trait TableView {
    /// Panel subheader.
    fn title(&self) -> &'static str;
    fn headers(&self) -> Vec<String>;
    /// Display strings, row-major, one per header.
    fn records(&self) -> Vec<Vec<String>>;
}

fn number(v: f64) -> String {
    format!("{v:?}")
}

impl TableView for LineChartTable {
    fn title(&self) -> &'static str {
        "Linechart Data"
    }

    fn headers(&self) -> Vec<String> {
        std::iter::once(String::new())
            .chain(self.cities().map(str::to_string))
            .collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        let columns: Vec<Vec<Option<f64>>> = self
            .cities()
            .filter_map(|city| self.values(city))
            .collect();
        self.labels()
            .iter()
            .enumerate()
            .map(|(row, label)| {
                let mut cells = Vec::with_capacity(columns.len() + 1);
                cells.push(label.clone());
                for col in &columns {
                    cells.push(col.get(row).copied().flatten().map(number).unwrap_or_default());
                }
                cells
            })
            .collect()
    }
}

impl TableView for ChoroplethTable {
    fn title(&self) -> &'static str {
        "Choropleth Map Data"
    }

    fn headers(&self) -> Vec<String> {
        Self::COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows()
            .iter()
            .map(|r| vec![r.province.clone(), r.year.to_string(), number(r.cents)])
            .collect()
    }
}

impl TableView for ScatterTable {
    fn title(&self) -> &'static str {
        "Scatterplot Data"
    }

    fn headers(&self) -> Vec<String> {
        Self::COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows()
            .iter()
            .map(|r| {
                vec![
                    r.city.clone(),
                    r.province.clone(),
                    r.year.to_string(),
                    number(r.cents),
                    number(r.population),
                    number(r.vehicles),
                ]
            })
            .collect()
    }
}

/// Render `view` as an HTML `<table>`. Every cell is escaped.
pub fn render_table(view: &dyn TableView) -> String {
    let mut html = String::from("<table class=\"data\">\n<thead><tr>");
    for h in view.headers() {
        html.push_str(&format!("<th>{}</th>", html_escape(&h)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in view.records() {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
