use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use accel_sim::io::{csv, json};
use accel_sim::io::json::AccelSummary;
use accel_sim::{
    render_chart, render_samples, simulate, terminal_speed, Constants, SimConfig, SimResult, State,
    Trace, VehicleParams,
};

#[derive(Parser)]
#[command(name = "accel-sim")]
#[command(about = "Constant-power acceleration and top speed simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate the speed trace and print it as JSON {time_s, velocity_ms}
    Solve {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[command(flatten)]
        sim: SimArgs,
        /// Also write the full trace as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print a run summary instead of the raw samples
        #[arg(long)]
        summary: bool,
    },
    /// Render speed vs. time with the top-speed reference line
    Chart {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[command(flatten)]
        sim: SimArgs,
        /// Wrap the SVG in a standalone HTML page
        #[arg(long)]
        html: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the closed-form top speed in km/h
    TopSpeed {
        #[command(flatten)]
        vehicle: VehicleArgs,
    },
    /// Print a human-readable acceleration report
    Report {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[command(flatten)]
        sim: SimArgs,
    },
}

#[derive(Args)]
struct VehicleArgs {
    /// Power at the wheels, kW
    #[arg(long)]
    power_kw: f64,
    /// Drag coefficient times frontal area, m^2
    #[arg(long)]
    cda_m2: f64,
    /// Vehicle mass, kg
    #[arg(long)]
    mass_kg: f64,
}

impl VehicleArgs {
    fn params(&self) -> SimResult<VehicleParams> {
        let params = VehicleParams::new(self.power_kw, self.cda_m2, self.mass_kg);
        params.validate()?;
        Ok(params)
    }
}

#[derive(Args)]
struct SimArgs {
    /// JSON file with simulation settings (horizon_s, initial, rtol, atol, ...)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulated duration, s
    #[arg(long)]
    horizon: Option<f64>,
    /// Initial speed, m/s
    #[arg(long)]
    v0: Option<f64>,
}

impl SimArgs {
    fn config(&self) -> SimResult<SimConfig> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => SimConfig::default(),
        };
        if let Some(h) = self.horizon {
            config.horizon_s = h;
        }
        if let Some(v0) = self.v0 {
            config.initial = State::new(config.initial.pos, v0);
        }
        Ok(config)
    }
}

const SUMMARY_THRESHOLDS_KMH: [f64; 3] = [100.0, 160.0, 200.0];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; data goes to stdout, logs to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let cli = Cli::parse();
    let consts = Constants::default();

    match cli.command {
        Commands::Solve { vehicle, sim, csv, summary } => {
            cmd_solve(&vehicle.params()?, &sim.config()?, &consts, csv.as_deref(), summary)?
        }
        Commands::Chart { vehicle, sim, html, output } => {
            cmd_chart(&vehicle.params()?, &sim.config()?, &consts, html, output.as_deref())?
        }
        Commands::TopSpeed { vehicle } => {
            println!("{:.2}", terminal_speed(&vehicle.params()?, &consts));
        }
        Commands::Report { vehicle, sim } => {
            let params = vehicle.params()?;
            let config = sim.config()?;
            let trace = simulate(&params, &config, &consts)?;
            print_report(&params, &config, &consts, &trace);
        }
    }
    Ok(())
}

fn cmd_solve(
    vehicle: &VehicleParams,
    config: &SimConfig,
    consts: &Constants,
    csv_path: Option<&Path>,
    summary: bool,
) -> SimResult<()> {
    let trace = simulate(vehicle, config, consts)?;

    if let Some(path) = csv_path {
        csv::write_trace_file(path, &trace, consts)?;
        info!("Wrote {} samples to {}", trace.len(), path.display());
    }

    let mut stdout = io::stdout().lock();
    if summary {
        let s = AccelSummary::from_trace(&trace, vehicle, consts, &SUMMARY_THRESHOLDS_KMH);
        json::write_summary(&mut stdout, vehicle, &s)
    } else {
        json::write_samples(&mut stdout, &render_samples(&trace))
    }
}

fn cmd_chart(
    vehicle: &VehicleParams,
    config: &SimConfig,
    consts: &Constants,
    html: bool,
    output: Option<&Path>,
) -> SimResult<()> {
    let markup = render_chart(vehicle, config, consts)?;
    let doc = if html {
        let title = format!(
            "Acceleration: {} kW, CdA {} m^2, {} kg",
            vehicle.power_kw, vehicle.cda_m2, vehicle.mass_kg
        );
        markup.to_html(&title)
    } else {
        markup.svg
    };

    match output {
        Some(path) => {
            fs::write(path, doc)?;
            info!("Chart written to {}", path.display());
        }
        None => io::stdout().lock().write_all(doc.as_bytes())?,
    }
    Ok(())
}

fn print_report(vehicle: &VehicleParams, config: &SimConfig, consts: &Constants, trace: &Trace) {
    let summary = AccelSummary::from_trace(trace, vehicle, consts, &SUMMARY_THRESHOLDS_KMH);

    println!();
    println!("====================================================================");
    println!("  ACCELERATION RUN");
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Power:         {:>8.1} kW    Mass:         {:>8.1} kg",
        vehicle.power_kw, vehicle.mass_kg
    );
    println!(
        "  CdA:           {:>8.3} m^2   Power/weight: {:>8.3} kW/kg",
        vehicle.cda_m2,
        vehicle.power_to_weight()
    );
    println!(
        "  Top speed:     {:>8.2} km/h  Air density:  {:>8.3} kg/m^3",
        summary.top_speed_kmh, consts.air_density
    );
    println!();

    println!("  Speed Milestones");
    println!("  ──────────────────────────────────────────────────────────────────");
    for c in &summary.crossings {
        match c.time_s {
            Some(t) => println!("  {:>5.0} km/h   t={:>6.2}s", c.speed_kmh, t),
            None => println!("  {:>5.0} km/h   not reached", c.speed_kmh),
        }
    }
    println!();

    println!("  Trace");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  {:>7}  {:>9}  {:>9}  {:>9}", "t (s)", "x (m)", "v (m/s)", "v (km/h)");

    let every = (trace.len() / 20).max(1);
    for (i, s) in trace.iter().enumerate() {
        if i % every != 0 && i != trace.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.1}  {:>9.2}  {:>9.1}",
            s.time,
            s.state.pos,
            s.state.vel,
            consts.to_display(s.state.vel)
        );
    }

    println!();
    println!(
        "  Simulation: {} samples, horizon={} s, rtol={:e}",
        summary.samples, config.horizon_s, config.rtol
    );
    println!("====================================================================");
    println!();
}
