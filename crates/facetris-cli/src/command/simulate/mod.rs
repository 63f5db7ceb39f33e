use std::{path::PathBuf, thread, time::Duration};

use facetris_engine::{GameSession, PieceSeed, SessionConfig};
use facetris_face::{ExpressionThresholds, FaceTracker, GestureThresholds, SharedExpressions};
use tracing::info;

use self::{
    autopilot::Autopilot,
    face_source::{DetectorThread, FaceScript, SyntheticFace},
};
use super::ThresholdArg;
use crate::util::Output;

mod autopilot;
mod face_source;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Upper bound on simulated play time, in seconds
    #[arg(long, default_value_t = 10)]
    seconds: u64,
    /// Length of one session tick, in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Interval between automatic drops, in milliseconds
    #[arg(long, default_value_t = 2000)]
    drop_ms: u64,
    /// Round time limit, in seconds
    #[arg(long, default_value_t = 180)]
    time_limit_secs: u64,
    /// Piece seed as 32 hex characters (random when omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Expression shown by the synthetic face
    #[arg(long, value_enum, default_value_t = FaceScript::Cycle)]
    expression: FaceScript,
    /// Landmark detections per second
    #[arg(long, default_value_t = 10)]
    detect_fps: u32,
    /// Run as fast as possible, detecting faces on the session thread
    #[arg(long)]
    turbo: bool,
    /// Write the summary to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    thresholds: ThresholdArg,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.tick_ms > 0, "--tick-ms must be positive");
    anyhow::ensure!(arg.detect_fps > 0, "--detect-fps must be positive");

    let thresholds = ExpressionThresholds::from(&arg.thresholds);
    let config = SessionConfig {
        drop_interval: Duration::from_millis(arg.drop_ms),
        time_limit: Duration::from_secs(arg.time_limit_secs),
        seed: arg.seed,
        expression_thresholds: thresholds,
        ..SessionConfig::default()
    };
    let mut session = GameSession::new(config);
    let (pilot_seed, face_seed) = derived_seeds(session.seed());
    let mut pilot = Autopilot::new(pilot_seed);
    let mut face = SyntheticFace::new(arg.expression, face_seed);

    let tick = Duration::from_millis(arg.tick_ms);
    let detect_interval = Duration::from_secs(1) / arg.detect_fps;
    let budget = Duration::from_secs(arg.seconds);

    let shared = SharedExpressions::default();
    let detector = (!arg.turbo).then(|| {
        DetectorThread::spawn(
            face.clone(),
            FaceTracker::new(thresholds, GestureThresholds::default()),
            shared.clone(),
            detect_interval,
        )
    });

    info!(seed = %session.seed(), turbo = arg.turbo, "simulation started");

    let mut simulated = Duration::ZERO;
    let mut next_detect = Duration::ZERO;
    while simulated < budget {
        if detector.is_some() {
            session.set_expression_flags(shared.load());
        }

        let input = pilot.next_frame(session.state());
        session.tick(tick, &input);

        // Faces are fed after the tick so the first one lands after the
        // session start has cleared the calibration.
        if detector.is_none() && simulated >= next_detect {
            session.observe_landmarks(Some(&face.next_frame()));
            next_detect += detect_interval;
        }

        simulated += tick;
        if session.state().is_showing_score() {
            break;
        }
        if !arg.turbo {
            thread::sleep(tick);
        }
    }

    if let Some(detector) = detector {
        detector.stop()?;
    }

    let summary = session.summary();
    info!(
        score = summary.score,
        pieces = summary.stats.completed_pieces(),
        "simulation finished"
    );

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    output.write_json(&summary)?;
    Ok(())
}

/// Splits a piece seed into seeds for the autopilot and the synthetic face.
#[expect(clippy::cast_possible_truncation)]
fn derived_seeds(seed: PieceSeed) -> (u64, u64) {
    let bits = u128::from_le_bytes(seed.to_bytes());
    (bits as u64, (bits >> 64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_seeds_differ() {
        let seed = PieceSeed::from_bytes([1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(derived_seeds(seed), (1, 2));
    }
}
