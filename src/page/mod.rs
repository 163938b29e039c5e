pub mod content;
pub mod table;

use std::fmt;
use tracing::debug;

use crate::dashboard::Dashboard;
use content::{commentary, CONTACTS, CONTACTS_HEADER, INTRO, PAGE_TITLE};
use table::{html_escape, render_table, TableView};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";
pub const LOTTIE_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js";
pub const LOTTIE_HEIGHT: u32 = 200;

/// The three chart sections of the page, in page order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Linechart,
    Choropleth,
    Scatterplot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::Linechart,
        ChartKind::Choropleth,
        ChartKind::Scatterplot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Linechart => "linechart",
            ChartKind::Choropleth => "choropleth",
            ChartKind::Scatterplot => "scatterplot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linechart" => Some(ChartKind::Linechart),
            "choropleth" => Some(ChartKind::Choropleth),
            "scatterplot" => Some(ChartKind::Scatterplot),
            _ => None,
        }
    }

    /// Section heading.
    pub fn subheader(&self) -> &'static str {
        match self {
            ChartKind::Linechart => "Linechart",
            ChartKind::Choropleth => "Choropleth Map",
            ChartKind::Scatterplot => "Scatterplot",
        }
    }

    pub fn toggle_label(&self) -> String {
        format!("Show {} Data", self.subheader())
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which raw data panels start open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelToggles {
    pub linechart: bool,
    pub choropleth: bool,
    pub scatterplot: bool,
}

impl PanelToggles {
    /// Parse a comma separated list of chart names. Unknown names are skipped.
    pub fn from_query(show: Option<&str>) -> Self {
        let mut toggles = Self::default();
        for name in show.unwrap_or("").split(',') {
            match ChartKind::parse(name) {
                Some(kind) => toggles.set(kind, true),
                None if name.trim().is_empty() => {}
                None => debug!(name, "ignoring unknown panel name"),
            }
        }
        toggles
    }

    pub fn all() -> Self {
        Self {
            linechart: true,
            choropleth: true,
            scatterplot: true,
        }
    }

    pub fn is_on(&self, kind: ChartKind) -> bool {
        match kind {
            ChartKind::Linechart => self.linechart,
            ChartKind::Choropleth => self.choropleth,
            ChartKind::Scatterplot => self.scatterplot,
        }
    }

    pub fn set(&mut self, kind: ChartKind, on: bool) {
        match kind {
            ChartKind::Linechart => self.linechart = on,
            ChartKind::Choropleth => self.choropleth = on,
            ChartKind::Scatterplot => self.scatterplot = on,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBlock {
    Lottie,
    Title,
    Section(ChartKind),
    Contacts,
}

/// Page layout, top to bottom.
pub const BLOCKS: [PageBlock; 6] = [
    PageBlock::Lottie,
    PageBlock::Title,
    PageBlock::Section(ChartKind::Linechart),
    PageBlock::Section(ChartKind::Choropleth),
    PageBlock::Section(ChartKind::Scatterplot),
    PageBlock::Contacts,
];

/// Where closed data panels get their content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSource {
    /// Fetched from `/panels/{chart}/data` the first time it is opened.
    Fetch,
    /// Rendered into the page up front and hidden.
    Embedded,
}

/// The raw data panel fragment for one chart: subheader plus table.
pub fn render_data_panel(view: &dyn TableView) -> String {
    format!(
        "<h3>{}</h3>\n{}",
        html_escape(view.title()),
        render_table(view)
    )
}

/// JSON placed inside a `<script>` element must not close it early.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub struct PageAssembler<'a> {
    dash: &'a Dashboard,
    panels: PanelSource,
}

impl<'a> PageAssembler<'a> {
    /// Page served over HTTP; closed panels are fetched on demand.
    pub fn live(dash: &'a Dashboard) -> Self {
        Self {
            dash,
            panels: PanelSource::Fetch,
        }
    }

    /// Self-contained page; every panel is embedded.
    pub fn standalone(dash: &'a Dashboard) -> Self {
        Self {
            dash,
            panels: PanelSource::Embedded,
        }
    }

    pub fn render(&self, toggles: PanelToggles) -> String {
        let body: Vec<String> = BLOCKS
            .iter()
            .map(|block| self.render_block(*block, toggles))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <script src="{lottie}"></script>
    <style>{css}</style>
</head>
<body>
<main>
{body}
</main>
<script>{js}</script>
</body>
</html>
"#,
            title = html_escape(PAGE_TITLE),
            plotly = PLOTLY_CDN,
            lottie = LOTTIE_CDN,
            css = inline_css(),
            body = body.join("\n"),
            js = inline_javascript(),
        )
    }

    fn render_block(&self, block: PageBlock, toggles: PanelToggles) -> String {
        match block {
            PageBlock::Lottie => format!(
                "<div id=\"lottie\" style=\"height:{LOTTIE_HEIGHT}px\"></div>\n\
                 <script type=\"application/json\" id=\"lottie-data\">{}</script>",
                script_json(self.dash.animation_json())
            ),
            PageBlock::Title => format!("<h1>{}</h1>\n{}", html_escape(PAGE_TITLE), INTRO),
            PageBlock::Section(kind) => self.render_section(kind, toggles.is_on(kind)),
            PageBlock::Contacts => format!("<hr>\n<h2>{CONTACTS_HEADER}</h2>\n{CONTACTS}"),
        }
    }

    fn render_section(&self, kind: ChartKind, open: bool) -> String {
        let name = kind.as_str();
        let embed = open || self.panels == PanelSource::Embedded;
        let panel = if embed {
            render_data_panel(self.dash.table(kind))
        } else {
            String::new()
        };

        format!(
            r#"<hr>
<section id="{name}">
<h2>{subheader}</h2>
<div id="figure-{name}" class="figure"></div>
<script type="application/json" id="figure-{name}-data">{figure}</script>
<label><input type="checkbox" class="panel-toggle" data-chart="{name}"{checked}> {label}</label>
<div id="panel-{name}" class="panel" data-loaded="{loaded}"{hidden}>{panel}</div>
{commentary}</section>"#,
            subheader = kind.subheader(),
            figure = script_json(self.dash.figure_json(kind)),
            checked = if open { " checked" } else { "" },
            label = kind.toggle_label(),
            loaded = embed,
            hidden = if open { "" } else { " hidden" },
            commentary = commentary(kind).to_html(),
        )
    }
}

fn inline_css() -> &'static str {
    r#"
body { font-family: "Source Sans Pro", sans-serif; margin: 0; color: #262730; }
main { max-width: 1040px; margin: 0 auto; padding: 2rem 1rem; }
hr { border: none; border-top: 1px solid #e6e6e6; margin: 2rem 0; }
.panel { overflow: auto; max-height: 400px; margin: 1rem 0; }
table.data { border-collapse: collapse; font-size: 0.85rem; }
table.data th, table.data td { border: 1px solid #e6e6e6; padding: 0.2rem 0.5rem; text-align: right; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
const readJson = (id) => JSON.parse(document.getElementById(id).textContent);

const pump = lottie.loadAnimation({
  container: document.getElementById('lottie'),
  renderer: 'svg',
  loop: true,
  autoplay: true,
  animationData: readJson('lottie-data'),
});
pump.setSpeed(1);

document.querySelectorAll('div.figure').forEach((div) => {
  const fig = readJson(div.id + '-data');
  Plotly.newPlot(div, fig.data, fig.layout).then(() => {
    if (fig.frames) { Plotly.addFrames(div, fig.frames); }
  });
});

document.querySelectorAll('input.panel-toggle').forEach((box) => {
  box.addEventListener('change', async () => {
    const panel = document.getElementById('panel-' + box.dataset.chart);
    if (!box.checked) { panel.hidden = true; return; }
    if (panel.dataset.loaded !== 'true') {
      const resp = await fetch('/panels/' + box.dataset.chart + '/data');
      if (!resp.ok) { box.checked = false; return; }
      panel.innerHTML = await resp.text();
      panel.dataset.loaded = 'true';
    }
    panel.hidden = false;
  });
});
"#
}
