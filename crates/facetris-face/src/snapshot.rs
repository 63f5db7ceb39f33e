use crate::{DegenerateFaceError, LandmarkSet};

/// Absolute distances measured on the calibration face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationDistances {
    pub eyebrow_outer_span: f64,
    pub eyebrow_top_span: f64,
    pub eyebrow_inner_span: f64,
    pub mouth_span: f64,
    pub glabella_to_mouth_center: f64,
    pub nose_to_mouth_bottom: f64,
}

/// Horizontal distances relative to the eyebrow outer span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalRatios {
    /// Always `1.0`; the reference itself.
    pub eyebrow_outer_span: f64,
    pub eyebrow_top_span: f64,
    pub eyebrow_inner_span: f64,
    pub mouth_span: f64,
}

/// Vertical distances relative to the glabella-to-mouth-center distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalRatios {
    /// Always `1.0`; the reference itself.
    pub glabella_to_mouth_center: f64,
    pub nose_to_mouth_bottom: f64,
}

/// Calibration taken from the first face seen in a session.
///
/// The ratios let later measurements be compared independently of how far
/// the player sits from the camera: a live reference distance multiplied by
/// a ratio gives the expected ("basis") value of the secondary distance.
///
/// A snapshot is immutable once built. Start a new session to recalibrate.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceSnapshot {
    landmarks: LandmarkSet,
    distances: CalibrationDistances,
    horizontal: HorizontalRatios,
    vertical: VerticalRatios,
}

impl FaceSnapshot {
    /// Measures a reference face.
    ///
    /// Fails when either reference distance is zero, since every ratio would
    /// be undefined.
    pub fn new(landmarks: &LandmarkSet) -> Result<Self, DegenerateFaceError> {
        let distances = CalibrationDistances {
            eyebrow_outer_span: landmarks.eyebrow_outer_span(),
            eyebrow_top_span: landmarks.eyebrow_top_span(),
            eyebrow_inner_span: landmarks.eyebrow_inner_span(),
            mouth_span: landmarks.mouth_width(),
            glabella_to_mouth_center: landmarks.glabella_to_mouth_center(),
            nose_to_mouth_bottom: landmarks.nose_to_mouth_bottom(),
        };

        let width = distances.eyebrow_outer_span;
        if width <= 0.0 {
            return Err(DegenerateFaceError::ZeroEyebrowSpan);
        }
        let height = distances.glabella_to_mouth_center;
        if height <= 0.0 {
            return Err(DegenerateFaceError::ZeroFaceHeight);
        }

        let horizontal = HorizontalRatios {
            eyebrow_outer_span: 1.0,
            eyebrow_top_span: distances.eyebrow_top_span / width,
            eyebrow_inner_span: distances.eyebrow_inner_span / width,
            mouth_span: distances.mouth_span / width,
        };
        let vertical = VerticalRatios {
            glabella_to_mouth_center: 1.0,
            nose_to_mouth_bottom: distances.nose_to_mouth_bottom / height,
        };

        Ok(Self {
            landmarks: *landmarks,
            distances,
            horizontal,
            vertical,
        })
    }

    /// Builds a snapshot from known ratios and reference lengths.
    ///
    /// The absolute distances are reconstructed from the ratios.
    #[must_use]
    pub fn from_ratios(
        landmarks: LandmarkSet,
        eyebrow_outer_span: f64,
        glabella_to_mouth_center: f64,
        horizontal: HorizontalRatios,
        vertical: VerticalRatios,
    ) -> Self {
        let distances = CalibrationDistances {
            eyebrow_outer_span,
            eyebrow_top_span: eyebrow_outer_span * horizontal.eyebrow_top_span,
            eyebrow_inner_span: eyebrow_outer_span * horizontal.eyebrow_inner_span,
            mouth_span: eyebrow_outer_span * horizontal.mouth_span,
            glabella_to_mouth_center,
            nose_to_mouth_bottom: glabella_to_mouth_center * vertical.nose_to_mouth_bottom,
        };
        Self {
            landmarks,
            distances,
            horizontal: HorizontalRatios {
                eyebrow_outer_span: 1.0,
                ..horizontal
            },
            vertical: VerticalRatios {
                glabella_to_mouth_center: 1.0,
                ..vertical
            },
        }
    }

    /// The calibration landmarks.
    #[must_use]
    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    #[must_use]
    pub fn distances(&self) -> &CalibrationDistances {
        &self.distances
    }

    #[must_use]
    pub fn horizontal(&self) -> &HorizontalRatios {
        &self.horizontal
    }

    #[must_use]
    pub fn vertical(&self) -> &VerticalRatios {
        &self.vertical
    }
}
