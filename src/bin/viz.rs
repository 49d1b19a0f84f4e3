use std::io;

use eframe::egui;
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints};
use tracing_subscriber::EnvFilter;

use accel_sim::vehicle::presets;
use accel_sim::{simulate, terminal_speed, Constants, SimConfig, SimError, Trace, VehicleParams};

fn main() -> eframe::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let app = AccelViz::new(presets::reference());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native("Acceleration Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct AccelViz {
    params: VehicleParams,
    config: SimConfig,
    consts: Constants,
    result: Result<Trace, SimError>,
}

impl AccelViz {
    fn new(params: VehicleParams) -> Self {
        let config = SimConfig::default();
        let consts = Constants::default();
        let result = simulate(&params, &config, &consts);
        Self { params, config, consts, result }
    }

    /// Re-run the simulation after a parameter changed.
    fn rerun(&mut self) {
        self.result = simulate(&self.params, &self.config, &self.consts);
    }
}

impl eframe::App for AccelViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut changed = false;

        egui::SidePanel::left("params").min_width(260.0).show(ctx, |ui| {
            ui.heading("Vehicle");
            changed |= ui
                .add(egui::Slider::new(&mut self.params.power_kw, 1.0..=1000.0).text("Power (kW)"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.params.cda_m2, 0.05..=2.0).text("CdA (m^2)"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.params.mass_kg, 50.0..=3000.0).text("Mass (kg)"))
                .changed();

            ui.separator();
            ui.heading("Run");
            changed |= ui
                .add(egui::Slider::new(&mut self.config.horizon_s, 1.0..=120.0).text("Horizon (s)"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.config.initial.vel, 0.5..=50.0).text("Start speed (m/s)"))
                .changed();

            ui.separator();
            ui.label(format!(
                "Top speed: {:.2} km/h",
                terminal_speed(&self.params, &self.consts)
            ));
            match &self.result {
                Ok(trace) => {
                    let v_end = trace.last().map_or(0.0, |s| s.state.vel);
                    ui.label(format!("Final speed: {:.1} km/h", self.consts.to_display(v_end)));
                    ui.label(format!("Solver samples: {}", trace.len()));
                }
                Err(e) => {
                    ui.colored_label(egui::Color32::RED, e.to_string());
                }
            }
        });

        if changed {
            self.rerun();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let top = terminal_speed(&self.params, &self.consts);
            let points: Vec<[f64; 2]> = match &self.result {
                Ok(trace) => trace
                    .iter()
                    .map(|s| [s.time, self.consts.to_display(s.state.vel)])
                    .collect(),
                Err(_) => Vec::new(),
            };

            Plot::new("speed")
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .y_axis_label("Speed (km/h)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Speed", PlotPoints::from(points)));
                    plot_ui.hline(HLine::new("Calculated top speed", top));
                });
        });
    }
}
