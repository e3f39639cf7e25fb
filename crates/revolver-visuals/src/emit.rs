//! Handing shaded meshes over to whoever displays them.
//!
//! A [`SurfaceEmitter`] receives a mesh together with its vertex colors.
//! [`PlyWriter`] and [`ObjWriter`] write standard mesh files
//! that 3D tools can import and render;
//! [`MeshBuffers`] just keeps plain copies of the buffers in memory.

use std::io::Write;
use std::path::Path;

use revolver_core::{Face, QuadMesh};

use crate::Color;

/// Error in emitting a surface.
#[derive(thiserror::Error, Debug)]
pub enum EmitError {
    /// Writing the output failed.
    #[error("Failed to write mesh output")]
    Io(#[from] std::io::Error),
    /// The number of colors didn't match the number of vertices.
    #[error("Got {colors} vertex colors for {vertices} vertices")]
    ColorCountMismatch {
        /// Number of colors given.
        colors: usize,
        /// Number of vertices in the mesh.
        vertices: usize,
    },
    /// The output format only holds one surface and one was already written.
    #[error("Output already contains a surface, the format supports only one")]
    AlreadyWritten,
}

/// A mesh and its vertex colors, ready to be emitted.
#[derive(Clone, Copy, Debug)]
pub struct Surface<'a> {
    /// Name of the object in the output.
    pub name: &'a str,
    /// The geometry.
    pub mesh: &'a QuadMesh,
    /// One color per vertex, if the surface is shaded.
    pub colors: Option<&'a [Color]>,
}

impl Surface<'_> {
    fn validate(&self) -> Result<(), EmitError> {
        match self.colors {
            Some(colors) if colors.len() != self.mesh.vertex_count() => {
                Err(EmitError::ColorCountMismatch {
                    colors: colors.len(),
                    vertices: self.mesh.vertex_count(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Something that accepts shaded surfaces.
pub trait SurfaceEmitter {
    /// Emit a surface.
    ///
    /// Fails if the colors don't line up with the vertices,
    /// or if the underlying output fails.
    fn emit(&mut self, surface: &Surface<'_>) -> Result<(), EmitError>;
}

/// Supported mesh file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    /// Stanford polygon format, ASCII variant. Holds one surface with RGBA colors.
    Ply,
    /// Wavefront OBJ. Holds any number of surfaces, colors as an RGB extension.
    Obj,
}

impl MeshFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ply" => Some(Self::Ply),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Create an emitter writing this format into the given output.
    pub fn emitter<'w, W: Write + 'w>(self, out: W) -> Box<dyn SurfaceEmitter + 'w> {
        match self {
            Self::Ply => Box::new(PlyWriter::new(out)),
            Self::Obj => Box::new(ObjWriter::new(out)),
        }
    }
}

/// Plain copies of an emitted surface's buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceBuffers {
    /// Name the surface was emitted with.
    pub name: String,
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Faces as indices into `vertices`.
    pub faces: Vec<Face>,
    /// One color per vertex, empty if the surface wasn't shaded.
    pub colors: Vec<Color>,
}

/// Collects emitted surfaces in memory.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers {
    /// Every surface emitted so far, in order.
    pub surfaces: Vec<SurfaceBuffers>,
}

impl SurfaceEmitter for MeshBuffers {
    fn emit(&mut self, surface: &Surface<'_>) -> Result<(), EmitError> {
        surface.validate()?;
        self.surfaces.push(SurfaceBuffers {
            name: surface.name.to_string(),
            vertices: surface.mesh.vertices.iter().map(|v| [v.x, v.y, v.z]).collect(),
            faces: surface.mesh.faces.clone(),
            colors: surface.colors.map(<[Color]>::to_vec).unwrap_or_default(),
        });
        Ok(())
    }
}

/// Writes a surface as an ASCII PLY file.
///
/// Vertex positions are written in double precision
/// and colors as 8-bit RGBA.
/// NaN vertex coordinates are written out as-is.
pub struct PlyWriter<W: Write> {
    out: W,
    written: bool,
}

impl<W: Write> PlyWriter<W> {
    /// Create a writer into the given output.
    pub fn new(out: W) -> Self {
        Self {
            out,
            written: false,
        }
    }

    /// Take back the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SurfaceEmitter for PlyWriter<W> {
    fn emit(&mut self, surface: &Surface<'_>) -> Result<(), EmitError> {
        surface.validate()?;
        if self.written {
            return Err(EmitError::AlreadyWritten);
        }
        let mesh = surface.mesh;
        let out = &mut self.out;

        writeln!(out, "ply")?;
        writeln!(out, "format ascii 1.0")?;
        writeln!(out, "comment {}", surface.name)?;
        writeln!(out, "element vertex {}", mesh.vertex_count())?;
        for axis in ["x", "y", "z"] {
            writeln!(out, "property double {axis}")?;
        }
        if surface.colors.is_some() {
            for channel in ["red", "green", "blue", "alpha"] {
                writeln!(out, "property uchar {channel}")?;
            }
        }
        writeln!(out, "element face {}", mesh.face_count())?;
        writeln!(out, "property list uchar uint vertex_indices")?;
        writeln!(out, "end_header")?;

        for (idx, v) in mesh.vertices.iter().enumerate() {
            write!(out, "{} {} {}", v.x, v.y, v.z)?;
            if let Some(colors) = surface.colors {
                let [r, g, b, a] = colors[idx];
                write!(out, " {r} {g} {b} {a}")?;
            }
            writeln!(out)?;
        }
        for [a, b, c, d] in &mesh.faces {
            writeln!(out, "4 {a} {b} {c} {d}")?;
        }
        out.flush()?;

        self.written = true;
        log::debug!(
            "Wrote PLY surface {:?} with {} vertices and {} faces",
            surface.name,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(())
    }
}

/// Writes surfaces as Wavefront OBJ objects.
///
/// Multiple surfaces can be written into the same output.
/// Colors are written with the common `v x y z r g b` extension;
/// alpha is dropped since the format has no place for it.
pub struct ObjWriter<W: Write> {
    out: W,
    /// OBJ indices are global across objects,
    /// so later objects are offset by the vertices written before them
    vertex_offset: usize,
}

impl<W: Write> ObjWriter<W> {
    /// Create a writer into the given output.
    pub fn new(out: W) -> Self {
        Self {
            out,
            vertex_offset: 0,
        }
    }

    /// Take back the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SurfaceEmitter for ObjWriter<W> {
    fn emit(&mut self, surface: &Surface<'_>) -> Result<(), EmitError> {
        surface.validate()?;
        let mesh = surface.mesh;
        let out = &mut self.out;

        writeln!(out, "o {}", surface.name)?;
        for (idx, v) in mesh.vertices.iter().enumerate() {
            write!(out, "v {} {} {}", v.x, v.y, v.z)?;
            if let Some(colors) = surface.colors {
                let [r, g, b, _] = colors[idx].map(|c| c as f64 / u8::MAX as f64);
                write!(out, " {r} {g} {b}")?;
            }
            writeln!(out)?;
        }
        // indices are 1-based
        let base = self.vertex_offset + 1;
        for face in &mesh.faces {
            let [a, b, c, d] = face.map(|i| i + base);
            writeln!(out, "f {a} {b} {c} {d}")?;
        }
        out.flush()?;

        self.vertex_offset += mesh.vertex_count();
        Ok(())
    }
}
