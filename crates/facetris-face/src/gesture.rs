use serde::Serialize;

use crate::{LandmarkIndex, LandmarkSet};

/// Nose displacement limits, in landmark units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureThresholds {
    pub horizontal: i32,
    pub vertical: i32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            horizontal: 50,
            vertical: 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalShift {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum VerticalShift {
    #[display("up")]
    Up,
    #[display("down")]
    Down,
}

/// Where the nose sits relative to the calibration pose.
///
/// Each axis reports a shift only when the displacement strictly exceeds its
/// threshold. The result is informational; it does not move pieces.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HeadGesture {
    pub horizontal: Option<HorizontalShift>,
    pub vertical: Option<VerticalShift>,
}

impl HeadGesture {
    /// Compares the nose of `current` against the nose of `baseline`.
    #[must_use]
    pub fn detect(
        baseline: &LandmarkSet,
        current: &LandmarkSet,
        thresholds: &GestureThresholds,
    ) -> Self {
        let base = baseline[LandmarkIndex::Nose];
        let nose = current[LandmarkIndex::Nose];

        let dx = i64::from(nose.x) - i64::from(base.x);
        let horizontal = (dx.abs() > i64::from(thresholds.horizontal)).then_some(if dx < 0 {
            HorizontalShift::Left
        } else {
            HorizontalShift::Right
        });

        let dy = i64::from(nose.y) - i64::from(base.y);
        let vertical = (dy.abs() > i64::from(thresholds.vertical)).then_some(if dy < 0 {
            VerticalShift::Up
        } else {
            VerticalShift::Down
        });

        Self {
            horizontal,
            vertical,
        }
    }

    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}
