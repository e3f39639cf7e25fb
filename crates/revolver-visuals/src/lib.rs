//! Colouring and output of meshes built with `revolver`.
//!
//! Nothing here renders anything.
//! Meshes are shaded by computing a colour per vertex from a [`ScalarField`]
//! and a [`ColorMap`], and then handed to a [`SurfaceEmitter`],
//! which either writes them to a mesh file for an external renderer
//! or keeps the buffers in memory.

#![warn(missing_docs)]

mod color_map;
#[doc(inline)]
pub use color_map::{builtin_color_maps, Color, ColorMap, TRANSPARENT};

pub mod shading;
#[doc(inline)]
pub use shading::{grid_colors, shade, ScalarField};

pub mod emit;
#[doc(inline)]
pub use emit::{
    EmitError, MeshBuffers, MeshFormat, ObjWriter, PlyWriter, Surface, SurfaceBuffers,
    SurfaceEmitter,
};

pub use palette;
