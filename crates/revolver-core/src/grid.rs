//! Flat plane meshes from gridded field samples.
//!
//! Alongside the revolved interface, field data from the simulation
//! (interpolated onto a square grid beforehand)
//! is shown as a coloured plane through the axis of symmetry.
//! The input is whitespace-delimited text with one sample per row:
//!
//! ```text
//! axial radial magnitude [r g b a ...]
//! ```
//!
//! The coordinate columns are in the same order as interface files
//! read with [`AxisConvention::AxialFirst`][crate::AxisConvention],
//! so the plane lines up with a revolved interface from the same run.
//!
//! If the RGBA columns are present they're used as-is for colouring,
//! otherwise colours are derived from the magnitude.

use std::path::{Path, PathBuf};

use itertools::iproduct;

use crate::{Face, QuadMesh, Vec3};

/// Error in loading grid data or building a plane from it.
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    /// The file couldn't be read.
    #[error("Failed to read grid data file {path:?}")]
    Io {
        /// Path of the file we tried to read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A row couldn't be interpreted as a grid sample.
    #[error("Invalid grid data on line {line}: {reason}")]
    Malformed {
        /// 1-based line number of the offending row.
        line: usize,
        /// Description of what was wrong with it.
        reason: String,
    },
    /// Not enough samples to make even one face.
    #[error("Grid needs at least 4 samples, got {0}")]
    TooFewSamples(usize),
}

/// Field samples on a square grid, one per row of the input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridData {
    /// Coordinate of each sample along the axis of symmetry.
    pub axial: Vec<f64>,
    /// Distance of each sample from the axis of symmetry.
    pub radial: Vec<f64>,
    /// Field magnitude at each sample.
    pub magnitudes: Vec<f64>,
    /// Precomputed RGBA colours in `[0, 1]`, if the data had them.
    pub colors: Option<Vec<[f64; 4]>>,
}

/// Number of columns needed for precomputed colours to be read.
const COLUMNS_WITH_COLOR: usize = 7;

impl GridData {
    /// Load grid data from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::parse(&text)?;
        log::debug!("Loaded {} grid samples from {path:?}", data.len());
        Ok(data)
    }

    /// Parse grid data from text.
    ///
    /// Every row must have the same number of columns, and at least 3.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut data = Self::default();
        let mut column_count: Option<usize> = None;
        let mut colors = Vec::new();

        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: String| GridError::Malformed {
                line: line_idx + 1,
                reason,
            };

            let values = line
                .split_whitespace()
                .map(|col| {
                    col.parse::<f64>()
                        .map_err(|_| malformed(format!("{col:?} is not a number")))
                })
                .collect::<Result<Vec<f64>, GridError>>()?;

            if values.len() < 3 {
                return Err(malformed(format!(
                    "expected at least 3 columns, got {}",
                    values.len()
                )));
            }
            match column_count {
                None => column_count = Some(values.len()),
                Some(count) if count != values.len() => {
                    return Err(malformed(format!(
                        "expected {count} columns like the previous rows, got {}",
                        values.len()
                    )));
                }
                Some(_) => {}
            }

            data.axial.push(values[0]);
            data.radial.push(values[1]);
            data.magnitudes.push(values[2]);
            if values.len() >= COLUMNS_WITH_COLOR {
                colors.push([values[3], values[4], values[5], values[6]]);
            }
        }

        if column_count.is_some_and(|c| c >= COLUMNS_WITH_COLOR) {
            data.colors = Some(colors);
        }
        Ok(data)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.axial.len()
    }

    /// Whether there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axial.is_empty()
    }

    /// Side length of the square grid the samples are laid out on.
    ///
    /// Samples past the largest square that fits are left out of the faces.
    #[inline]
    pub fn grid_size(&self) -> usize {
        // sqrt of an exact square can come out a hair low, correct for that
        let mut size = (self.len() as f64).sqrt() as usize;
        while (size + 1) * (size + 1) <= self.len() {
            size += 1;
        }
        size
    }
}

/// Parameters for [`plane_mesh`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaneParams {
    /// Negate the radial coordinate,
    /// placing the plane on the negative `x` side of the axis of symmetry.
    pub mirror_x: bool,
}

/// Build a flat quad mesh in the `xz` plane from grid samples.
///
/// Every sample becomes a vertex at `(radial, 0, axial)`,
/// matching the first angular step of [`revolve`][crate::revolve].
/// Samples are assumed to be in row-major order on a square grid;
/// neighboring samples are connected into quads.
pub fn plane_mesh(data: &GridData, params: &PlaneParams) -> Result<QuadMesh, GridError> {
    if data.len() < 4 {
        return Err(GridError::TooFewSamples(data.len()));
    }

    let sign = if params.mirror_x { -1.0 } else { 1.0 };
    let vertices: Vec<Vec3> = data
        .radial
        .iter()
        .zip(&data.axial)
        .map(|(&r, &h)| Vec3::new(sign * r, 0.0, h))
        .collect();

    let size = data.grid_size();
    if size * size != data.len() {
        log::warn!(
            "{} grid samples don't form a square, using a {size}x{size} grid",
            data.len()
        );
    }
    let faces: Vec<Face> = iproduct!(0..size - 1, 0..size - 1)
        .map(|(i, j)| {
            let idx = i * size + j;
            [idx, idx + 1, idx + size + 1, idx + size]
        })
        .collect();

    Ok(QuadMesh { vertices, faces })
}
