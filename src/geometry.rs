// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder geometry and the detection acceptance filter
//!
//! All coordinates are in capture-source units. The viewfinder region is a
//! fixed centered square derived once from the display dimensions; it is
//! only recomputed on an explicit resize event. The acceptance filter is a
//! pure function: it never touches session state.

/// A point in capture-source coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle (origin + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the rectangle outward by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Whether `self` lies entirely inside `outer`
    pub fn contained_in(&self, outer: &Rect) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.x + self.width <= outer.x + outer.width
            && self.y + self.height <= outer.y + outer.height
    }

    fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// A rectangle with positive, finite extent
    fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Detection geometry as reported by a capture source
///
/// Sources report either an axis-aligned bounding rectangle or the ordered
/// corner points of the symbol. Corner points are normalized to a bounding
/// rectangle (min/max reduction) when accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(Rect),
    Corners(Vec<Point>),
}

/// Display dimensions in capture-source coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The fixed on-screen square within which a detection must fall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewfinderRegion {
    rect: Rect,
}

impl ViewfinderRegion {
    /// Compute the centered square for a display
    pub fn centered(display: DisplaySize, side: f32) -> Self {
        Self {
            rect: Rect::new(
                (display.width - side) / 2.0,
                (display.height - side) / 2.0,
                side,
                side,
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn side(&self) -> f32 {
        self.rect.width
    }
}

/// Outcome of the geometric acceptance filter
#[derive(Debug, Clone, PartialEq)]
pub struct Acceptance {
    pub accepted: bool,
    /// Bounding rectangle of the accepted geometry; `None` when the
    /// detection carried no bounds (permissive pass)
    pub normalized_bounds: Option<Rect>,
}

impl Acceptance {
    fn rejected() -> Self {
        Self {
            accepted: false,
            normalized_bounds: None,
        }
    }
}

/// Minimum corner points for a usable polygon
const MIN_CORNER_POINTS: usize = 4;

/// Decide whether a detection's geometry is eligible for acceptance.
///
/// The geometry must lie entirely inside the viewfinder region expanded by
/// `margin` (sensor noise tolerance). A detection without bounds passes
/// unconditionally so reduced-capability sources still function. Malformed
/// geometry (empty size, too few corner points, non-finite coordinates) is
/// insufficient data and is rejected.
pub fn evaluate(bounds: Option<&Geometry>, region: &ViewfinderRegion, margin: f32) -> Acceptance {
    let Some(geometry) = bounds else {
        return Acceptance {
            accepted: true,
            normalized_bounds: None,
        };
    };

    let target = region.rect().expanded(margin);

    match geometry {
        Geometry::Rect(rect) => {
            if !rect.is_well_formed() {
                return Acceptance::rejected();
            }
            if rect.contained_in(&target) {
                Acceptance {
                    accepted: true,
                    normalized_bounds: Some(*rect),
                }
            } else {
                Acceptance::rejected()
            }
        }
        Geometry::Corners(points) => {
            if points.len() < MIN_CORNER_POINTS || points.iter().any(|p| !p.is_finite()) {
                return Acceptance::rejected();
            }
            if points.iter().all(|p| target.contains_point(p)) {
                Acceptance {
                    accepted: true,
                    normalized_bounds: Some(bounding_rect(points)),
                }
            } else {
                Acceptance::rejected()
            }
        }
    }
}

/// Bounding rectangle of a point set (min/max reduction over x and y)
fn bounding_rect(points: &[Point]) -> Rect {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_1000x2000() -> ViewfinderRegion {
        // Centered square of side 240 on a 1000x2000 display: x 380, y 880
        ViewfinderRegion::centered(DisplaySize::new(1000.0, 2000.0), 240.0)
    }

    #[test]
    fn test_region_is_centered() {
        let region = region_1000x2000();
        assert_eq!(region.rect(), Rect::new(380.0, 880.0, 240.0, 240.0));
        assert_eq!(region.center(), Point::new(500.0, 1000.0));
    }

    #[test]
    fn test_rect_outside_region_is_rejected() {
        let region = region_1000x2000();
        let bounds = Geometry::Rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        let result = evaluate(Some(&bounds), &region, 10.0);
        assert!(!result.accepted);
        assert_eq!(result.normalized_bounds, None);
    }

    #[test]
    fn test_rect_fully_inside_is_accepted() {
        let region = region_1000x2000();
        let rect = Rect::new(420.0, 920.0, 100.0, 100.0);
        let result = evaluate(Some(&Geometry::Rect(rect)), &region, 10.0);
        assert!(result.accepted);
        assert_eq!(result.normalized_bounds, Some(rect));
    }

    #[test]
    fn test_margin_tolerates_slight_overhang() {
        let region = region_1000x2000();
        // Pokes 5 units past the left edge; inside the 10-unit margin
        let rect = Rect::new(375.0, 900.0, 100.0, 100.0);
        assert!(evaluate(Some(&Geometry::Rect(rect)), &region, 10.0).accepted);
        // Without the margin the same rect is rejected
        assert!(!evaluate(Some(&Geometry::Rect(rect)), &region, 0.0).accepted);
    }

    #[test]
    fn test_corner_points_accepted_and_normalized() {
        let region = region_1000x2000();
        let points = Geometry::Corners(vec![
            Point::new(400.0, 900.0),
            Point::new(500.0, 905.0),
            Point::new(495.0, 1000.0),
            Point::new(402.0, 998.0),
        ]);
        let result = evaluate(Some(&points), &region, 10.0);
        assert!(result.accepted);
        let bounds = result.normalized_bounds.unwrap();
        assert_eq!(bounds.x, 400.0);
        assert_eq!(bounds.y, 900.0);
        assert_eq!(bounds.width, 100.0);
        assert_eq!(bounds.height, 100.0);
    }

    #[test]
    fn test_one_corner_outside_rejects() {
        let region = region_1000x2000();
        let points = Geometry::Corners(vec![
            Point::new(400.0, 900.0),
            Point::new(500.0, 905.0),
            Point::new(495.0, 1000.0),
            Point::new(100.0, 100.0),
        ]);
        assert!(!evaluate(Some(&points), &region, 10.0).accepted);
    }

    #[test]
    fn test_missing_bounds_pass_unconditionally() {
        let region = region_1000x2000();
        let result = evaluate(None, &region, 10.0);
        assert!(result.accepted);
        assert_eq!(result.normalized_bounds, None);
    }

    #[test]
    fn test_malformed_geometry_is_rejected() {
        let region = region_1000x2000();
        // Zero-size rectangle
        let empty = Geometry::Rect(Rect::new(400.0, 900.0, 0.0, 0.0));
        assert!(!evaluate(Some(&empty), &region, 10.0).accepted);
        // Non-finite origin
        let nan = Geometry::Rect(Rect::new(f32::NAN, 900.0, 10.0, 10.0));
        assert!(!evaluate(Some(&nan), &region, 10.0).accepted);
        // Too few corner points
        let partial = Geometry::Corners(vec![Point::new(400.0, 900.0), Point::new(420.0, 920.0)]);
        assert!(!evaluate(Some(&partial), &region, 10.0).accepted);
    }

    #[test]
    fn test_resize_rederives_region() {
        let before = ViewfinderRegion::centered(DisplaySize::new(1000.0, 2000.0), 240.0);
        let after = ViewfinderRegion::centered(DisplaySize::new(2000.0, 1000.0), 240.0);
        assert_ne!(before, after);
        assert_eq!(after.rect(), Rect::new(880.0, 380.0, 240.0, 240.0));
    }
}
