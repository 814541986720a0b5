//! # ChocoMold Solid
//!
//! Turns a normalized pattern into a mold solid: builds the base, extrudes
//! the pattern into a tool, and subtracts the tool from the base.
//!
//! ## Components
//! - **Base**: block or four-sided frustum centered on the origin
//! - **Kernel**: [`BooleanKernel`] seam over csgrs with failures as values
//! - **Builder**: [`MoldBuilder`] with a defined fallback at every boolean step
//! - **Session**: [`MoldSession`] caches the transform and mesh between edits
//!
//! Builds are synchronous and CPU-bound. Independent sessions share no state
//! and can run on separate threads.

pub mod base;
pub mod builder;
pub mod kernel;
pub mod mesh;
pub mod session;

pub use base::build_base;
pub use builder::{BuildOutcome, BuildReport, MoldBuilder};
pub use kernel::{BooleanKernel, BooleanOutcome, CsgKernel};
pub use mesh::{Bounds3, SolidMesh};
pub use session::MoldSession;
