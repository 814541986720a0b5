//! # ChocoMold Core
//!
//! Core types, constants, and errors shared by every ChocoMold crate.
//! Provides the 2-D data model that flows through the pattern pipeline
//! (points, rings, polygons with holes, shape sets) and the mold-space
//! transform that maps a pattern onto the mold footprint.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod shape_set;

pub use error::{Error, Result};
pub use geometry::{Bounds, CropRectangle, Point, Polygon, Ring};
pub use shape_set::{ShapeSet, Transform};
