use std::sync::Arc;

use super::Point;

/// Anything that can produce an ordered sequence of points.
///
/// The order is the point indexing seen by callers (pixel output order), and
/// repeated calls on the same fixture must return the same sequence.
pub trait Fixture: Send + Sync {
    fn points(&self) -> &[Point];
}

pub type SharedFixture = Arc<dyn Fixture>;

/// Leaf fixture over a fixed, externally supplied point list.
///
/// Clones share the same point storage.
#[derive(Debug, Clone)]
pub struct BasicFixture {
    points: Arc<[Point]>,
}

impl BasicFixture {
    pub fn new(points: Vec<Point>) -> BasicFixture {
        BasicFixture {
            points: points.into(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn shared(self) -> SharedFixture {
        Arc::new(self)
    }
}

impl From<Vec<Point>> for BasicFixture {
    fn from(points: Vec<Point>) -> Self {
        BasicFixture::new(points)
    }
}

impl Fixture for BasicFixture {
    fn points(&self) -> &[Point] {
        &self.points
    }
}
