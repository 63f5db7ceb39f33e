use std::ops::Index;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::LandmarkCountError;

/// Integer 2D coordinate delivered by the landmark detector.
///
/// `x` grows rightward and `y` grows downward, as in image space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }

    /// Midpoint of two points, truncated toward zero on each axis.
    #[must_use]
    pub const fn center(self, other: Self) -> Self {
        Self {
            x: self.x.midpoint(other.x),
            y: self.y.midpoint(other.y),
        }
    }
}

/// Anatomical meaning of each slot in a [`LandmarkSet`].
///
/// The order is the detector's output order: five mirrored eye-region pairs
/// (left first), then the nose and four mouth points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LandmarkIndex {
    LeftEyebrowOuter = 0,
    RightEyebrowOuter = 1,
    LeftEyebrowTop = 2,
    RightEyebrowTop = 3,
    LeftEyebrowInner = 4,
    RightEyebrowInner = 5,
    LeftEyeInner = 6,
    RightEyeInner = 7,
    LeftEyeOuter = 8,
    RightEyeOuter = 9,
    Nose = 10,
    MouthRight = 11,
    MouthBottom = 12,
    MouthTop = 13,
    MouthLeft = 14,
}

/// The 15 tracked landmark points of one detection cycle.
///
/// The length is enforced at construction; indexing by [`LandmarkIndex`]
/// can therefore never go out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkSet([Point; LandmarkSet::LEN]);

impl LandmarkSet {
    /// Number of points in a set.
    pub const LEN: usize = 15;

    #[must_use]
    pub const fn new(points: [Point; Self::LEN]) -> Self {
        Self(points)
    }

    #[must_use]
    pub fn get(&self, index: LandmarkIndex) -> Point {
        self.0[index as usize]
    }

    #[must_use]
    pub fn points(&self) -> &[Point; Self::LEN] {
        &self.0
    }

    /// Distance between two landmarks.
    #[must_use]
    pub fn distance(&self, a: LandmarkIndex, b: LandmarkIndex) -> f64 {
        self.get(a).distance(self.get(b))
    }

    /// Distance between the outer ends of both eyebrows.
    ///
    /// This is the reference length for all horizontal ratios.
    #[must_use]
    pub fn eyebrow_outer_span(&self) -> f64 {
        self.distance(
            LandmarkIndex::LeftEyebrowOuter,
            LandmarkIndex::RightEyebrowOuter,
        )
    }

    #[must_use]
    pub fn eyebrow_top_span(&self) -> f64 {
        self.distance(LandmarkIndex::LeftEyebrowTop, LandmarkIndex::RightEyebrowTop)
    }

    #[must_use]
    pub fn eyebrow_inner_span(&self) -> f64 {
        self.distance(
            LandmarkIndex::LeftEyebrowInner,
            LandmarkIndex::RightEyebrowInner,
        )
    }

    /// Distance between the mouth corners.
    #[must_use]
    pub fn mouth_width(&self) -> f64 {
        self.distance(LandmarkIndex::MouthLeft, LandmarkIndex::MouthRight)
    }

    /// Distance between the top and bottom of the mouth.
    #[must_use]
    pub fn mouth_height(&self) -> f64 {
        self.distance(LandmarkIndex::MouthTop, LandmarkIndex::MouthBottom)
    }

    /// Midpoint between the inner eyebrow ends.
    #[must_use]
    pub fn glabella(&self) -> Point {
        self.get(LandmarkIndex::LeftEyebrowInner)
            .center(self.get(LandmarkIndex::RightEyebrowInner))
    }

    /// Midpoint between the top and bottom of the mouth.
    #[must_use]
    pub fn mouth_center(&self) -> Point {
        self.get(LandmarkIndex::MouthTop)
            .center(self.get(LandmarkIndex::MouthBottom))
    }

    /// Distance from the glabella to the mouth center.
    ///
    /// This is the reference length for all vertical ratios.
    #[must_use]
    pub fn glabella_to_mouth_center(&self) -> f64 {
        self.glabella().distance(self.mouth_center())
    }

    #[must_use]
    pub fn nose_to_mouth_bottom(&self) -> f64 {
        self.distance(LandmarkIndex::Nose, LandmarkIndex::MouthBottom)
    }
}

impl Index<LandmarkIndex> for LandmarkSet {
    type Output = Point;

    fn index(&self, index: LandmarkIndex) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl TryFrom<&[Point]> for LandmarkSet {
    type Error = LandmarkCountError;

    fn try_from(points: &[Point]) -> Result<Self, Self::Error> {
        let points = <[Point; Self::LEN]>::try_from(points).map_err(|_| LandmarkCountError {
            expected: Self::LEN,
            actual: points.len(),
        })?;
        Ok(Self(points))
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = LandmarkCountError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::try_from(points.as_slice())
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let points = Vec::<Point>::deserialize(deserializer)?;
        Self::try_from(points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point::new(1, 2);
        let b = Point::new(4, 6);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
        assert!((b.distance(a) - 5.0).abs() < f64::EPSILON);
        assert!(a.distance(a).abs() < f64::EPSILON);
    }

    #[test]
    fn test_center_truncates() {
        assert_eq!(Point::new(1, 2).center(Point::new(4, 5)), Point::new(2, 3));
        assert_eq!(Point::new(-3, 0).center(Point::new(0, 0)), Point::new(-1, 0));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let (min, max) = (Point::new(i32::MIN, 0), Point::new(i32::MAX, 0));
        let expected = f64::from(i32::MAX) - f64::from(i32::MIN);
        assert!((min.distance(max) - expected).abs() < 1.0);
        assert_eq!(max.center(max), max);
        assert_eq!(min.center(max), Point::new(0, 0));
        assert_eq!(
            Point::new(i32::MAX, i32::MIN).center(Point::new(i32::MAX - 2, i32::MIN + 2)),
            Point::new(i32::MAX - 1, i32::MIN + 1)
        );
    }

    #[test]
    fn test_try_from_rejects_wrong_length() {
        let err = LandmarkSet::try_from(vec![Point::default(); 14]).unwrap_err();
        assert_eq!(
            err,
            LandmarkCountError {
                expected: 15,
                actual: 14
            }
        );
        assert!(LandmarkSet::try_from(vec![Point::default(); 16]).is_err());
        assert!(LandmarkSet::try_from(vec![Point::default(); 15]).is_ok());
    }

    #[test]
    fn test_index_by_anatomy() {
        let mut points = [Point::default(); LandmarkSet::LEN];
        points[10] = Point::new(7, 8);
        points[14] = Point::new(1, 1);
        let set = LandmarkSet::new(points);
        assert_eq!(set[LandmarkIndex::Nose], Point::new(7, 8));
        assert_eq!(set.get(LandmarkIndex::MouthLeft), Point::new(1, 1));
    }

    #[test]
    fn test_deserialize_checks_length() {
        let json = serde_json::to_string(&vec![Point::new(1, 2); 15]).unwrap();
        let set: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.points()[0], Point::new(1, 2));

        let short = serde_json::to_string(&vec![Point::new(1, 2); 3]).unwrap();
        let err = serde_json::from_str::<LandmarkSet>(&short).unwrap_err();
        assert!(err.to_string().contains("expected 15 landmark points, got 3"));
    }
}
