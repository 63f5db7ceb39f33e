use clap::{Parser, Subcommand};
use facetris_face::ExpressionThresholds;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

use self::{classify::ClassifyArg, simulate::SimulateArg};

mod classify;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log level for facetris crates (overrides `RUST_LOG` for them)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless session against a synthetic face
    Simulate(#[clap(flatten)] SimulateArg),
    /// Classify recorded landmark frames
    Classify(#[clap(flatten)] ClassifyArg),
}

/// Classifier borders shared by the subcommands.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ThresholdArg {
    /// Mouth widening over its basis needed for a smile
    #[arg(long, default_value_t = 10.0)]
    smile_border: f64,
    /// Inner-eyebrow narrowing needed for anger
    #[arg(long, default_value_t = -7.0, allow_negative_numbers = true)]
    angry_eyebrow_border: f64,
    /// Nose-to-mouth shortening needed for anger
    #[arg(long, default_value_t = -5.0, allow_negative_numbers = true)]
    angry_nose_border: f64,
    /// Pixels an inner eyebrow end must rise above the opposite eyebrow top
    #[arg(long, default_value_t = 3)]
    raised_eyebrow_border: i32,
    /// Face tilt (radians) beyond which raised eyebrows are ignored
    #[arg(long, default_value_t = 0.075)]
    max_inclination: f64,
}

impl From<&ThresholdArg> for ExpressionThresholds {
    fn from(arg: &ThresholdArg) -> Self {
        Self {
            smile: arg.smile_border,
            angry_eyebrow: arg.angry_eyebrow_border,
            angry_nose_to_mouth: arg.angry_nose_border,
            raised_eyebrow: arg.raised_eyebrow_border,
            max_inclination: arg.max_inclination,
            ..Self::default()
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.log_level);
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Classify(arg) => classify::run(&arg)?,
    }
    Ok(())
}

/// Logs go to stderr; stdout is reserved for JSON output.
fn init_logging(level: Option<LevelFilter>) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let level = level.or_else(|| {
        std::env::var_os(EnvFilter::DEFAULT_ENV)
            .is_none()
            .then_some(LevelFilter::INFO)
    });
    if let Some(level) = level {
        for target in ["facetris", "facetris_engine", "facetris_face"] {
            if let Ok(d) = format!("{target}={level}").parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
