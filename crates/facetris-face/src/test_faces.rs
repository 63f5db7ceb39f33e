use crate::{LandmarkIndex as L, LandmarkSet, Point};

/// A frontal, level face: eyebrow outer span 100, mouth 50 wide and 20 tall,
/// glabella (150, 100), mouth center (150, 180), nose (150, 150).
pub(crate) fn neutral_face() -> LandmarkSet {
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
    LandmarkSet::new(points)
}

/// Returns `face` with the given landmarks moved.
pub(crate) fn with_points(face: &LandmarkSet, moves: &[(L, i32, i32)]) -> LandmarkSet {
    let mut points = *face.points();
    for &(index, x, y) in moves {
        points[index as usize] = Point::new(x, y);
    }
    LandmarkSet::new(points)
}
