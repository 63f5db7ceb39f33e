use std::path::PathBuf;

use facetris_face::{
    Expression, ExpressionFlags, ExpressionThresholds, FaceTracker, GestureThresholds, HeadGesture,
    LandmarkSet, Observation, Point,
};
use serde::Serialize;
use tracing::{info, warn};

use super::ThresholdArg;
use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClassifyArg {
    /// JSON file holding an array of frames; each frame is `null` or 15 points
    file: PathBuf,
    /// Write the results to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    thresholds: ThresholdArg,
}

#[derive(Debug, Serialize)]
struct FrameReport {
    frame: usize,
    observation: &'static str,
    flags: ExpressionFlags,
    active: Vec<&'static str>,
    gesture: HeadGesture,
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let frames: Vec<Option<Vec<Point>>> = util::read_json_file("landmark", &arg.file)?;
    info!(frames = frames.len(), file = %arg.file.display(), "classifying landmark frames");

    let mut tracker = FaceTracker::new(
        ExpressionThresholds::from(&arg.thresholds),
        GestureThresholds::default(),
    );
    let mut output = Output::from_output_path(arg.output.as_deref())?;
    for (frame, points) in frames.into_iter().enumerate() {
        let observation = classify_frame(&mut tracker, frame, points);
        let flags = tracker.flags();
        output.write_json_line(&FrameReport {
            frame,
            observation,
            flags,
            active: flags.active().into_iter().map(Expression::label).collect(),
            gesture: tracker.gesture(),
        })?;
    }
    output.flush()?;
    Ok(())
}

fn classify_frame(
    tracker: &mut FaceTracker,
    frame: usize,
    points: Option<Vec<Point>>,
) -> &'static str {
    let landmarks = match points.map(LandmarkSet::try_from).transpose() {
        Ok(landmarks) => landmarks,
        Err(e) => {
            warn!(frame, "skipping malformed frame: {e}");
            return "malformed";
        }
    };
    match tracker.observe(landmarks.as_ref()) {
        Observation::NoFace => "no_face",
        Observation::Rejected(_) => "rejected",
        Observation::Calibrated => "calibrated",
        Observation::Updated => "updated",
    }
}

#[cfg(test)]
mod tests {
    use facetris_face::LandmarkIndex;

    use super::*;

    fn neutral_points() -> Vec<Point> {
        let json = r#"[
            {"x":100,"y":100},{"x":200,"y":100},{"x":120,"y":95},{"x":180,"y":95},
            {"x":140,"y":100},{"x":160,"y":100},{"x":135,"y":115},{"x":165,"y":115},
            {"x":110,"y":115},{"x":190,"y":115},{"x":150,"y":150},{"x":175,"y":180},
            {"x":150,"y":190},{"x":150,"y":170},{"x":125,"y":180}
        ]"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_frame_sequence() {
        let mut tracker = FaceTracker::default();
        let mut smile = neutral_points();
        smile[LandmarkIndex::MouthLeft as usize] = Point::new(110, 178);
        smile[LandmarkIndex::MouthRight as usize] = Point::new(190, 178);

        assert_eq!(classify_frame(&mut tracker, 0, None), "no_face");
        assert_eq!(
            classify_frame(&mut tracker, 1, Some(vec![Point::default(); 3])),
            "malformed"
        );
        assert_eq!(
            classify_frame(&mut tracker, 2, Some(neutral_points())),
            "calibrated"
        );
        assert_eq!(classify_frame(&mut tracker, 3, Some(smile)), "updated");
        assert_eq!(
            tracker
                .flags()
                .active()
                .into_iter()
                .map(Expression::label)
                .collect::<Vec<_>>(),
            ["smile"]
        );
        assert_eq!(classify_frame(&mut tracker, 4, None), "no_face");
        assert!(tracker.flags().any());
    }

    #[test]
    fn test_degenerate_reference_rejected() {
        let mut tracker = FaceTracker::default();
        let points = vec![Point::new(5, 5); LandmarkSet::LEN];
        assert_eq!(classify_frame(&mut tracker, 0, Some(points)), "rejected");
        assert!(!tracker.is_calibrated());
    }
}
