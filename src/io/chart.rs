use std::fmt;

use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tracing::debug;

use crate::dynamics::state::SimConfig;
use crate::dynamics::terminal_speed;
use crate::error::{SimError, SimResult};
use crate::physics::Constants;
use crate::sim::{simulate, Trace};
use crate::vehicle::VehicleParams;

const CHART_SIZE: (u32, u32) = (900, 540);

/// Rendered chart: a standalone SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMarkup {
    pub svg: String,
}

impl ChartMarkup {
    /// Wrap the SVG in a minimal self-contained HTML page.
    pub fn to_html(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{svg}\n</body>\n</html>\n",
            title = escape_html(title),
            svg = self.svg,
        )
    }
}

impl fmt::Display for ChartMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.svg)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> SimError {
    SimError::Render { message: e.to_string() }
}

/// Simulate the vehicle and chart speed (km/h) against time with the
/// computed top speed as a horizontal reference line.
pub fn render_chart(
    vehicle: &VehicleParams,
    config: &SimConfig,
    consts: &Constants,
) -> SimResult<ChartMarkup> {
    let trace = simulate(vehicle, config, consts)?;
    draw_chart(&trace, terminal_speed(vehicle, consts), consts)
}

/// Draw an existing trace. Pure rendering; no physics is evaluated here.
pub fn draw_chart(trace: &Trace, top_speed_kmh: f64, consts: &Constants) -> SimResult<ChartMarkup> {
    let points: Vec<(f64, f64)> = trace
        .iter()
        .map(|s| (s.time, consts.to_display(s.state.vel)))
        .collect();

    let x_max = trace.last().map_or(1.0, |s| s.time).max(1e-3);
    let y_max = points
        .iter()
        .map(|p| p.1)
        .fold(top_speed_kmh, f64::max)
        .max(1.0)
        * 1.1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .caption("Acceleration", ("sans-serif", 22))
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .y_desc("Speed (km/h)")
            .light_line_style(BLACK.mix(0.05))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(points, &BLUE))
            .map_err(render_err)?
            .label("Speed")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        chart
            .draw_series(LineSeries::new(
                vec![(0.0, top_speed_kmh), (x_max, top_speed_kmh)],
                &RED,
            ))
            .map_err(render_err)?
            .label(format!("Calculated top speed ({top_speed_kmh:.2} km/h)"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    debug!(bytes = svg.len(), samples = trace.len(), "chart rendered");
    Ok(ChartMarkup { svg })
}
