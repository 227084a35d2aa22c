use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

pub mod fixture;
pub mod model;

/// A single light-emitting point in installation space.
///
/// Points carry no unit and no bounds. They are plain values: any change
/// produces a new `Point`, so a point handed to a [`model::Model`] can never be
/// altered underneath it.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
    z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32) -> Point {
        Point { x, y, z }
    }

    pub fn origin() -> Point {
        Point {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn flat(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn translate(&self, offset: &Point) -> Point {
        Point {
            x: self.x + offset.x,
            y: self.y + offset.y,
            z: self.z + offset.z,
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Point::origin()
    }
}

impl From<[f32; 3]> for Point {
    fn from(value: [f32; 3]) -> Point {
        Point::new(value[0], value[1], value[2])
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn of(&self, point: &Point) -> f32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
            Axis::Z => point.z,
        }
    }

    fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Extent of a point set along one axis. `range` is always `max - min`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    pub min: f32,
    pub max: f32,
    pub range: f32,
}

impl AxisBounds {
    fn new(min: f32, max: f32) -> Self {
        AxisBounds {
            min,
            max,
            range: max - min,
        }
    }
}
