use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    DegenerateFaceError, ExpressionClassifier, ExpressionFlags, ExpressionThresholds, FaceSnapshot,
    GestureThresholds, HeadGesture, LandmarkSet,
};

/// What [`FaceTracker::observe`] did with a detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Observation {
    /// No face was delivered; prior state is unchanged.
    NoFace,
    /// The face could not serve as a calibration reference.
    Rejected(DegenerateFaceError),
    /// The snapshot was taken from this face, then it was classified.
    Calibrated,
    /// Classified against the existing snapshot.
    Updated,
}

/// Per-session owner of the calibration snapshot and the latest results.
///
/// The first usable face becomes the snapshot; it stays fixed until
/// [`reset`](Self::reset) is called for a new session.
#[derive(Debug, Default, Clone)]
pub struct FaceTracker {
    classifier: ExpressionClassifier,
    gesture_thresholds: GestureThresholds,
    snapshot: Option<FaceSnapshot>,
    flags: ExpressionFlags,
    gesture: HeadGesture,
}

impl FaceTracker {
    #[must_use]
    pub fn new(thresholds: ExpressionThresholds, gesture_thresholds: GestureThresholds) -> Self {
        Self {
            classifier: ExpressionClassifier::new(thresholds),
            gesture_thresholds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.snapshot.is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&FaceSnapshot> {
        self.snapshot.as_ref()
    }

    /// The flags of the latest classified face.
    #[must_use]
    pub fn flags(&self) -> ExpressionFlags {
        self.flags
    }

    #[must_use]
    pub fn gesture(&self) -> HeadGesture {
        self.gesture
    }

    pub fn observe(&mut self, landmarks: Option<&LandmarkSet>) -> Observation {
        let Some(landmarks) = landmarks else {
            return Observation::NoFace;
        };

        let observation = if self.snapshot.is_some() {
            Observation::Updated
        } else {
            match FaceSnapshot::new(landmarks) {
                Ok(snapshot) => {
                    tracing::info!(
                        eyebrow_outer_span = snapshot.distances().eyebrow_outer_span,
                        mouth_ratio = snapshot.horizontal().mouth_span,
                        "face calibrated"
                    );
                    self.snapshot = Some(snapshot);
                    Observation::Calibrated
                }
                Err(err) => {
                    tracing::warn!(%err, "calibration face rejected");
                    return Observation::Rejected(err);
                }
            }
        };

        if let Some(snapshot) = &self.snapshot {
            let flags = self.classifier.classify(snapshot, landmarks);
            self.gesture =
                HeadGesture::detect(snapshot.landmarks(), landmarks, &self.gesture_thresholds);
            if flags != self.flags {
                tracing::debug!(active = ?flags.active(), "expression changed");
            }
            self.flags = flags;
        }
        observation
    }

    /// Forgets the snapshot and the latest results.
    pub fn reset(&mut self) {
        self.snapshot = None;
        self.flags = ExpressionFlags::default();
        self.gesture = HeadGesture::default();
    }
}

/// Last-writer-wins cell holding the most recent [`ExpressionFlags`].
///
/// Clones share the same cell, so a detection thread can publish while the
/// game loop reads.
///
/// # Example
///
/// ```
/// use facetris_face::{Expression, ExpressionFlags, SharedExpressions};
///
/// let shared = SharedExpressions::default();
/// let writer = shared.clone();
///
/// let mut flags = ExpressionFlags::default();
/// flags.set(Expression::Angry, true);
/// writer.publish(flags);
///
/// assert!(shared.load().get(Expression::Angry));
/// ```
#[derive(Debug, Default, Clone)]
pub struct SharedExpressions(Arc<Mutex<ExpressionFlags>>);

impl SharedExpressions {
    pub fn publish(&self, flags: ExpressionFlags) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = flags;
    }

    #[must_use]
    pub fn load(&self) -> ExpressionFlags {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
