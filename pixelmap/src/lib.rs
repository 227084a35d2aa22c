#![deny(clippy::all)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![deny(clippy::style)]
#![deny(clippy::print_stdout)]
#![deny(clippy::cast_lossless)]

//! Static spatial geometry for installations of light-emitting points.
//!
//! Fixtures produce ordered points; a [`Model`] flattens any tree of fixtures
//! into one immutable point sequence with its centroid and per-axis bounds.

pub mod config;
pub mod error;
pub mod world;

pub use config::{ChildRef, FixtureDefinition, ModelConfig, ModelDefinition};
pub use error::{ConfigError, Result};
pub use world::{
    fixture::{BasicFixture, Fixture, SharedFixture},
    model::{Model, ModelSummary},
    Axis, AxisBounds, Point,
};
