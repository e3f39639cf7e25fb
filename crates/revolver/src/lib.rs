//! `revolver` turns interface curves from axisymmetric two-phase flow simulations
//! into 3D surfaces that can be rendered with external tools.
//!
//! An axisymmetric solver only resolves one half-plane through the axis of symmetry.
//! The interface between the phases is extracted from a snapshot
//! as a set of line segments in that half-plane.
//! To show it as the 3D shape it represents,
//! the curve is swept around the axis:
//!
//! 1. [`load_points`] reads the segment endpoints from a text file,
//! 2. [`stitch`] joins the segments into a [`Profile`],
//!    marking discontinuities with gaps,
//! 3. [`revolve`] sweeps the profile through half a turn into a [`QuadMesh`],
//! 4. with the `visuals` feature, the mesh is colored by height
//!    and written out with a [`SurfaceEmitter`][visuals::SurfaceEmitter].
//!
//! The [`pipeline`] module chains these steps together.
//!
//! ```
//! # use revolver::{parse_points, stitch, revolve, StitchParams, RevolveParams};
//! let points = parse_points("1 0\n1 1\n\n1 1\n2 1.5\n")?;
//! let profile = stitch(&points, &StitchParams::default())?;
//! let mesh = revolve(&profile, &RevolveParams::default())?;
//! assert_eq!(mesh.vertex_count(), 64 * 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Snapshots can be batch-processed into interface files
//! by an external extraction tool with [`extract_interfaces`].

#![warn(missing_docs)]

pub use revolver_core::*;

#[cfg(feature = "visuals")]
#[doc(inline)]
pub use revolver_visuals as visuals;

#[cfg(feature = "visuals")]
pub mod pipeline;
