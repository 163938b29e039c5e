pub mod animation;
pub mod choropleth;
pub mod figure;
pub mod line;
pub mod range;
pub mod scatter;

pub use choropleth::{build_choropleth, ChoroplethFigure, JoinReport};
pub use figure::Figure;
pub use line::build_line_chart;
pub use range::{padded_range, PaddedRange};
pub use scatter::build_scatter;
