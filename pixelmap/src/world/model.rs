use std::{fmt, ops::Range, sync::Arc};

use log::debug;
use serde::Serialize;

use super::{
    fixture::{BasicFixture, Fixture, SharedFixture},
    Axis, AxisBounds, Point,
};

/// An immutable composition of fixtures.
///
/// All points of the child fixtures are flattened into one sequence, in child
/// order, and the aggregate geometry (centroid, per-axis min/max/range) is
/// computed once at construction. A `Model` is itself a [`Fixture`], so models
/// nest to any depth. Nothing on a `Model` can be changed after it is built;
/// a new geometry means a new `Model`.
#[derive(Clone)]
pub struct Model {
    points: Vec<Point>,
    fixtures: Vec<SharedFixture>,
    fixture_ranges: Vec<Range<usize>>,
    center: Point,
    bounds: [AxisBounds; 3],
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ModelSummary {
    pub points: usize,
    pub fixtures: usize,
    pub center: Point,
    pub x: AxisBounds,
    pub y: AxisBounds,
    pub z: AxisBounds,
}

impl Model {
    /// Flattens `fixtures` in order and computes the aggregates.
    pub fn new(fixtures: Vec<SharedFixture>) -> Model {
        let mut points: Vec<Point> = vec![];
        let mut fixture_ranges: Vec<Range<usize>> = Vec::with_capacity(fixtures.len());

        for fixture in fixtures.iter() {
            let start = points.len();
            points.extend_from_slice(fixture.points());
            fixture_ranges.push(start..points.len());
        }

        let (center, bounds) = aggregate(&points);

        debug!(
            "Built model with {} points from {} fixtures, centered at {}",
            points.len(),
            fixtures.len(),
            center
        );

        Model {
            points,
            fixtures,
            fixture_ranges,
            center,
            bounds,
        }
    }

    /// The null model: no fixtures, no points, every aggregate zero.
    pub fn empty() -> Model {
        Model::new(vec![])
    }

    pub fn from_points(points: Vec<Point>) -> Model {
        Model::from_fixture(BasicFixture::new(points))
    }

    pub fn from_fixture<F: Fixture + 'static>(fixture: F) -> Model {
        let fixture: SharedFixture = Arc::new(fixture);
        Model::new(vec![fixture])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Direct children, exactly as passed to the constructor.
    pub fn fixtures(&self) -> &[SharedFixture] {
        &self.fixtures
    }

    /// For each direct child, the indices its points occupy in [`Model::points`].
    pub fn fixture_ranges(&self) -> &[Range<usize>] {
        &self.fixture_ranges
    }

    pub fn fixture_points(&self, fixture: usize) -> Option<&[Point]> {
        let range = self.fixture_ranges.get(fixture)?;
        self.points.get(range.clone())
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn centroid(&self) -> Point {
        self.center
    }

    pub fn bounds(&self, axis: Axis) -> AxisBounds {
        self.bounds[axis.index()]
    }

    pub fn cx(&self) -> f32 {
        self.center.x()
    }

    pub fn cy(&self) -> f32 {
        self.center.y()
    }

    pub fn cz(&self) -> f32 {
        self.center.z()
    }

    pub fn x_min(&self) -> f32 {
        self.bounds(Axis::X).min
    }

    pub fn x_max(&self) -> f32 {
        self.bounds(Axis::X).max
    }

    pub fn x_range(&self) -> f32 {
        self.bounds(Axis::X).range
    }

    pub fn y_min(&self) -> f32 {
        self.bounds(Axis::Y).min
    }

    pub fn y_max(&self) -> f32 {
        self.bounds(Axis::Y).max
    }

    pub fn y_range(&self) -> f32 {
        self.bounds(Axis::Y).range
    }

    pub fn z_min(&self) -> f32 {
        self.bounds(Axis::Z).min
    }

    pub fn z_max(&self) -> f32 {
        self.bounds(Axis::Z).max
    }

    pub fn z_range(&self) -> f32 {
        self.bounds(Axis::Z).range
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            points: self.size(),
            fixtures: self.fixtures.len(),
            center: self.center,
            x: self.bounds(Axis::X),
            y: self.bounds(Axis::Y),
            z: self.bounds(Axis::Z),
        }
    }
}

/// Single pass over `points`. Min/max are seeded from the first point, never
/// from zero, and the mean divides by at least one.
fn aggregate(points: &[Point]) -> (Point, [AxisBounds; 3]) {
    let mut sum = [0.0_f32; 3];
    let mut min = [0.0_f32; 3];
    let mut max = [0.0_f32; 3];

    for (index, point) in points.iter().enumerate() {
        for (axis, value) in point.flat().iter().copied().enumerate() {
            sum[axis] += value;

            if index == 0 {
                min[axis] = value;
                max[axis] = value;
            } else {
                if value < min[axis] {
                    min[axis] = value;
                }
                if value > max[axis] {
                    max[axis] = value;
                }
            }
        }
    }

    let count = points.len().max(1) as f32;
    let center = Point::new(sum[0] / count, sum[1] / count, sum[2] / count);
    let bounds = [
        AxisBounds::new(min[0], max[0]),
        AxisBounds::new(min[1], max[1]),
        AxisBounds::new(min[2], max[2]),
    ];

    (center, bounds)
}

impl Default for Model {
    fn default() -> Self {
        Model::empty()
    }
}

impl From<Vec<Point>> for Model {
    fn from(points: Vec<Point>) -> Self {
        Model::from_points(points)
    }
}

impl Fixture for Model {
    fn points(&self) -> &[Point] {
        &self.points
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("points", &self.points.len())
            .field("fixtures", &self.fixtures.len())
            .field("center", &self.center)
            .field("bounds", &self.bounds)
            .finish()
    }
}
