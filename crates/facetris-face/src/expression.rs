use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{FaceSnapshot, LandmarkIndex, LandmarkSet};

/// Facial expressions recognized by the classifier.
///
/// The discriminants are stable: they index [`ExpressionFlags`] and the
/// candidate slots of the piece queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Expression {
    #[display("smile")]
    Smile = 0,
    #[display("angry")]
    Angry = 1,
    #[display("surprised")]
    Surprised = 2,
    /// One eyebrow raised (a suspicious look).
    #[display("sus")]
    #[serde(rename = "sus")]
    SusBrow = 3,
}

impl Expression {
    /// Number of expressions (4).
    pub const COUNT: usize = 4;

    /// All expressions in canonical order.
    pub const ALL: [Self; Self::COUNT] = [Self::Smile, Self::Angry, Self::Surprised, Self::SusBrow];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Smile),
            1 => Some(Self::Angry),
            2 => Some(Self::Surprised),
            3 => Some(Self::SusBrow),
            _ => None,
        }
    }

    /// Short label shown next to the piece picked by this expression.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::SusBrow => "sus",
        }
    }
}

/// The latest classification result, one flag per [`Expression`].
///
/// # Example
///
/// ```
/// use facetris_face::{Expression, ExpressionFlags};
///
/// let mut flags = ExpressionFlags::default();
/// flags.set(Expression::SusBrow, true);
/// flags.set(Expression::Smile, true);
///
/// let active: Vec<_> = flags.active().into_iter().collect();
/// assert_eq!(active, [Expression::Smile, Expression::SusBrow]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ExpressionFlags([bool; Expression::COUNT]);

impl ExpressionFlags {
    #[must_use]
    pub const fn new(flags: [bool; Expression::COUNT]) -> Self {
        Self(flags)
    }

    #[must_use]
    pub const fn get(&self, expression: Expression) -> bool {
        self.0[expression.index()]
    }

    pub const fn set(&mut self, expression: Expression, value: bool) {
        self.0[expression.index()] = value;
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.0.iter().any(|&f| f)
    }

    /// Returns the active expressions in canonical order.
    #[must_use]
    pub fn active(&self) -> ArrayVec<Expression, { Expression::COUNT }> {
        Expression::ALL
            .into_iter()
            .filter(|&e| self.get(e))
            .collect()
    }

    #[must_use]
    pub const fn as_array(&self) -> &[bool; Expression::COUNT] {
        &self.0
    }
}

/// Tunable borders of the expression classifier.
///
/// Distances are in landmark (pixel) units, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionThresholds {
    /// Minimum widening of the mouth over its basis for a smile.
    pub smile: f64,
    /// Inner-eyebrow narrowing (negative) required for anger.
    pub angry_eyebrow: f64,
    /// Nose-to-mouth-bottom shortening (negative) required for anger.
    pub angry_nose_to_mouth: f64,
    /// How far an inner eyebrow end must rise above the opposite eyebrow top.
    pub raised_eyebrow: i32,
    /// Face inclination beyond which the raised-eyebrow check is skipped.
    pub max_inclination: f64,
    /// Angle the glabella-to-mouth line reports for an upright face.
    pub upright_angle: f64,
}

impl Default for ExpressionThresholds {
    fn default() -> Self {
        Self {
            smile: 10.0,
            angry_eyebrow: -7.0,
            angry_nose_to_mouth: -5.0,
            raised_eyebrow: 3,
            max_inclination: 0.075,
            upright_angle: 1.5,
        }
    }
}

/// Maps live landmarks to [`ExpressionFlags`] against a calibration snapshot.
///
/// Every check is a pure function of its inputs. Comparisons against the
/// snapshot use a *basis* distance: a live reference distance multiplied by
/// the snapshot ratio, so the result does not depend on how large the face
/// currently appears.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ExpressionClassifier {
    thresholds: ExpressionThresholds,
}

impl ExpressionClassifier {
    #[must_use]
    pub const fn new(thresholds: ExpressionThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub const fn thresholds(&self) -> &ExpressionThresholds {
        &self.thresholds
    }

    /// Runs all four checks.
    #[must_use]
    pub fn classify(&self, snapshot: &FaceSnapshot, landmarks: &LandmarkSet) -> ExpressionFlags {
        let mut flags = ExpressionFlags::default();
        flags.set(Expression::Smile, self.is_smile(snapshot, landmarks));
        flags.set(Expression::Angry, self.is_angry(snapshot, landmarks));
        flags.set(Expression::Surprised, Self::is_surprised(landmarks));
        flags.set(Expression::SusBrow, self.is_sus_brow(landmarks));
        flags
    }

    /// The mouth is wider than the calibration predicts for the current face size.
    #[must_use]
    pub fn is_smile(&self, snapshot: &FaceSnapshot, landmarks: &LandmarkSet) -> bool {
        let basis = landmarks.eyebrow_outer_span() * snapshot.horizontal().mouth_span;
        landmarks.mouth_width() - basis > self.thresholds.smile
    }

    /// The brows draw together and the lower face compresses at the same time.
    #[must_use]
    pub fn is_angry(&self, snapshot: &FaceSnapshot, landmarks: &LandmarkSet) -> bool {
        let basis_inner = landmarks.eyebrow_outer_span() * snapshot.horizontal().eyebrow_inner_span;
        let frowning = landmarks.eyebrow_inner_span() - basis_inner < self.thresholds.angry_eyebrow;

        let basis_nose =
            landmarks.glabella_to_mouth_center() * snapshot.vertical().nose_to_mouth_bottom;
        let pressed =
            landmarks.nose_to_mouth_bottom() - basis_nose < self.thresholds.angry_nose_to_mouth;

        frowning && pressed
    }

    /// The mouth is taller than it is wide. Needs no calibration.
    #[must_use]
    pub fn is_surprised(landmarks: &LandmarkSet) -> bool {
        landmarks.mouth_height() > landmarks.mouth_width()
    }

    /// Either inner eyebrow end sits clearly above the opposite eyebrow top.
    ///
    /// Returns `false` while the face is tilted past the inclination limit,
    /// since vertical comparisons are unreliable then.
    #[must_use]
    pub fn is_sus_brow(&self, landmarks: &LandmarkSet) -> bool {
        if self.inclination(landmarks).abs() > self.thresholds.max_inclination {
            return false;
        }

        let border = i64::from(self.thresholds.raised_eyebrow);
        let rise = |inner: LandmarkIndex, top: LandmarkIndex| {
            i64::from(landmarks[top].y) - i64::from(landmarks[inner].y)
        };
        let left_raised =
            rise(LandmarkIndex::LeftEyebrowInner, LandmarkIndex::RightEyebrowTop) > border;
        let right_raised =
            rise(LandmarkIndex::RightEyebrowInner, LandmarkIndex::LeftEyebrowTop) > border;
        left_raised || right_raised
    }

    /// Angle of the glabella-to-mouth-center line relative to upright.
    #[must_use]
    pub fn inclination(&self, landmarks: &LandmarkSet) -> f64 {
        let glabella = landmarks.glabella();
        let mouth = landmarks.mouth_center();
        let dy = f64::from(mouth.y) - f64::from(glabella.y);
        let dx = f64::from(mouth.x) - f64::from(glabella.x);
        dy.atan2(dx) - self.thresholds.upright_angle
    }
}
