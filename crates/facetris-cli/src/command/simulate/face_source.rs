use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use facetris_face::{
    Expression, FaceTracker, LandmarkIndex as L, LandmarkSet, Observation, Point,
    SharedExpressions,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

/// Frames each expression is held for in [`FaceScript::Cycle`].
const CYCLE_FRAMES: u64 = 20;

/// Maximum whole-face drift per frame, in pixels.
const JITTER: i32 = 2;

/// What the synthetic face does over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum FaceScript {
    Neutral,
    Smile,
    Angry,
    Surprised,
    Sus,
    /// Neutral, then each expression in turn, repeating.
    Cycle,
}

impl FaceScript {
    fn expression_at(self, frame: u64) -> Option<Expression> {
        match self {
            Self::Neutral => None,
            Self::Smile => Some(Expression::Smile),
            Self::Angry => Some(Expression::Angry),
            Self::Surprised => Some(Expression::Surprised),
            Self::Sus => Some(Expression::SusBrow),
            Self::Cycle => {
                #[expect(clippy::cast_possible_truncation)]
                let phase = ((frame / CYCLE_FRAMES) % (Expression::COUNT as u64 + 1)) as usize;
                phase.checked_sub(1).and_then(Expression::from_index)
            }
        }
    }
}

/// A level, frontal face with an eyebrow span of 100 px.
fn neutral_points() -> [Point; LandmarkSet::LEN] {
    let mut points = [Point::default(); LandmarkSet::LEN];
    for (index, x, y) in [
        (L::LeftEyebrowOuter, 100, 100),
        (L::RightEyebrowOuter, 200, 100),
        (L::LeftEyebrowTop, 120, 95),
        (L::RightEyebrowTop, 180, 95),
        (L::LeftEyebrowInner, 140, 100),
        (L::RightEyebrowInner, 160, 100),
        (L::LeftEyeInner, 135, 115),
        (L::RightEyeInner, 165, 115),
        (L::LeftEyeOuter, 110, 115),
        (L::RightEyeOuter, 190, 115),
        (L::Nose, 150, 150),
        (L::MouthRight, 175, 180),
        (L::MouthBottom, 150, 190),
        (L::MouthTop, 150, 170),
        (L::MouthLeft, 125, 180),
    ] {
        points[index as usize] = Point::new(x, y);
    }
    points
}

fn expression_moves(expression: Expression) -> &'static [(L, i32, i32)] {
    match expression {
        Expression::Smile => &[(L::MouthLeft, 110, 178), (L::MouthRight, 190, 178)],
        Expression::Angry => &[
            (L::LeftEyebrowInner, 147, 102),
            (L::RightEyebrowInner, 153, 102),
            (L::Nose, 150, 162),
        ],
        Expression::Surprised => &[(L::MouthTop, 150, 150), (L::MouthBottom, 150, 215)],
        Expression::SusBrow => &[(L::LeftEyebrowInner, 140, 85)],
    }
}

/// Scripted landmark generator standing in for a camera and detector.
///
/// The first frame is always neutral so that it can serve as the
/// calibration reference.
#[derive(Debug, Clone)]
pub(crate) struct SyntheticFace {
    script: FaceScript,
    rng: Pcg32,
    frame: u64,
}

impl SyntheticFace {
    pub(crate) fn new(script: FaceScript, seed: u64) -> Self {
        Self {
            script,
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
        }
    }

    pub(crate) fn next_frame(&mut self) -> LandmarkSet {
        let mut points = neutral_points();
        let expression = (self.frame > 0)
            .then(|| self.script.expression_at(self.frame))
            .flatten();
        if let Some(expression) = expression {
            for &(index, x, y) in expression_moves(expression) {
                points[index as usize] = Point::new(x, y);
            }
        }

        let dx = self.rng.random_range(-JITTER..=JITTER);
        let dy = self.rng.random_range(-JITTER..=JITTER);
        for point in &mut points {
            point.x += dx;
            point.y += dy;
        }

        self.frame += 1;
        LandmarkSet::new(points)
    }
}

/// Detection loop on its own thread, publishing flags at a fixed rate.
#[derive(Debug)]
pub(crate) struct DetectorThread {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl DetectorThread {
    pub(crate) fn spawn(
        mut face: SyntheticFace,
        mut tracker: FaceTracker,
        shared: SharedExpressions,
        interval: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = thread::spawn({
            let stop = Arc::clone(&stop);
            move || {
                while !stop.load(Ordering::Relaxed) {
                    let landmarks = face.next_frame();
                    if !matches!(tracker.observe(Some(&landmarks)), Observation::Rejected(_)) {
                        shared.publish(tracker.flags());
                    }
                    thread::sleep(interval);
                }
            }
        });
        Self { stop, handle }
    }

    pub(crate) fn stop(self) -> anyhow::Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        self.handle
            .join()
            .map_err(|_| anyhow::anyhow!("face detector thread panicked"))
    }
}
