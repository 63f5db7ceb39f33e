//! Facial-landmark geometry for expression-driven piece selection.
//!
//! The crate never sees pixels. An external detector delivers a
//! [`LandmarkSet`] (15 ordered points) per detection cycle, and this crate turns
//! it into game-relevant signals:
//!
//! - [`FaceSnapshot`] - one-time calibration ratios taken from the first face
//! - [`ExpressionClassifier`] - per-cycle [`ExpressionFlags`] (smile, angry,
//!   surprised, raised eyebrow)
//! - [`HeadGesture`] - nose displacement relative to the calibration pose
//! - [`FaceTracker`] - the per-session owner of the above
//! - [`SharedExpressions`] - last-writer-wins cell for threaded hosts
//!
//! # Example
//!
//! ```
//! use facetris_face::{FaceTracker, LandmarkSet, Point};
//!
//! let points = vec![Point::new(0, 0); LandmarkSet::LEN];
//! let mut tracker = FaceTracker::default();
//!
//! // A degenerate face (all points equal) cannot be calibrated.
//! let landmarks = LandmarkSet::try_from(points).unwrap();
//! assert!(tracker.observe(Some(&landmarks)).is_rejected());
//! assert!(!tracker.is_calibrated());
//! ```

pub use self::{expression::*, gesture::*, landmark::*, snapshot::*, tracker::*};

mod expression;
mod gesture;
mod landmark;
mod snapshot;
mod tracker;

#[cfg(test)]
mod test_faces;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {expected} landmark points, got {actual}")]
pub struct LandmarkCountError {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DegenerateFaceError {
    #[display("eyebrow outer span is zero")]
    ZeroEyebrowSpan,
    #[display("glabella to mouth center distance is zero")]
    ZeroFaceHeight,
}
