use derive_more::{AsRef, Deref, Display, From, Into};

/// Spans at or above this many degrees are drawn as a full disc.
const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// SVG path data (`d` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct PathData(String);

crate::impl_string_newtype!(PathData);

/// Converts a polar coordinate to cartesian. Angles run clockwise from 12 o'clock.
pub fn cartesian(center: Point, degrees: f64, length: f64) -> Point {
    let radians = (degrees - 90.0).to_radians();
    Point::new(
        center.x + length * radians.cos(),
        center.y + length * radians.sin(),
    )
}

/// Pie wedge anchored at `center`, from `start_degrees` to `end_degrees`.
///
/// The outline runs centre -> end point -> arc back to the start point -> close.
/// A zero-width span yields a closed path with no area.
pub fn sector_arc_path(
    center: Point,
    start_degrees: f64,
    end_degrees: f64,
    outer_radius: f64,
) -> PathData {
    let span = end_degrees - start_degrees;
    let tip = cartesian(center, end_degrees, outer_radius);
    let base = cartesian(center, start_degrees, outer_radius);
    let r = outer_radius;

    let arc = if span >= FULL_TURN {
        // start and end coincide; SVG drops an arc between identical points
        let half = cartesian(center, start_degrees + FULL_TURN / 2.0, outer_radius);
        format!(
            "A{r} {r} 0 0 0 {} {} A{r} {r} 0 0 0 {} {}",
            half.x, half.y, base.x, base.y
        )
    } else {
        let large_arc = u8::from(span > FULL_TURN / 2.0);
        format!("A{r} {r} 0 {large_arc} 0 {} {}", base.x, base.y)
    };

    PathData::new(format!(
        "M{},{}L{},{} {arc} z",
        center.x, center.y, tip.x, tip.y
    ))
}

/// Radial line at `degrees` between two radii.
pub fn spoke_path(center: Point, degrees: f64, inner_radius: f64, outer_radius: f64) -> PathData {
    let start = cartesian(center, degrees, inner_radius);
    let end = cartesian(center, degrees, outer_radius);
    PathData::new(format!("M{},{} L{},{}", start.x, start.y, end.x, end.y))
}
