pub mod chart;
pub mod csv;
pub mod json;

pub use chart::{draw_chart, render_chart, ChartMarkup};
pub use json::{render_samples, AccelSummary, Samples};
