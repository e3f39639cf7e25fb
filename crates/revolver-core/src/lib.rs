//! This is the core crate containing most of `revolver`'s functionality
//! (specifically, everything except colouring and mesh output).
//! See the `revolver` crate's documentation for an overview of the pipeline.

#![warn(missing_docs)]

pub mod mesh;
#[doc(inline)]
pub use mesh::{BoundingBox, Face, QuadMesh};

pub mod interface;
#[doc(inline)]
pub use interface::{load_points, parse_points, LoadError};

pub mod stitch;
#[doc(inline)]
pub use stitch::{stitch, AxisConvention, Profile, StitchError, StitchParams};

pub mod revolve;
#[doc(inline)]
pub use revolve::{revolve, revolve_coords, GapPolicy, RevolveError, RevolveParams};

pub mod grid;
#[doc(inline)]
pub use grid::{plane_mesh, GridData, GridError, PlaneParams};

pub mod tool;
#[doc(inline)]
pub use tool::{
    extract_interfaces, CommandTemplate, ExtractParams, Invocation, ProcessRunner, Timesteps,
    ToolError, ToolRunner,
};

// nalgebra re-exports of common types for convenience

pub use nalgebra as na;
/// Type alias for a 2D `nalgebra` vector.
pub type Vec2 = na::Vector2<f64>;
/// Type alias for a 3D `nalgebra` vector.
pub type Vec3 = na::Vector3<f64>;
