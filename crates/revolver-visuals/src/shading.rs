//! Per-vertex scalar fields and turning them into vertex colors.

use nalgebra as na;
use revolver_core::{GridData, QuadMesh};

use crate::{Color, ColorMap};

/// A value for every vertex of a mesh.
///
/// Non-finite values are allowed and are ignored
/// when computing the range of the field.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    /// The underlying vector of values, one per vertex.
    pub values: na::DVector<f64>,
}

impl ScalarField {
    /// Create a field from a list of values.
    #[inline]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            values: na::DVector::from_vec(values),
        }
    }

    /// The height (`z` coordinate) of every vertex in a mesh.
    ///
    /// For revolved meshes this is the position along the axis of symmetry.
    pub fn heights(mesh: &QuadMesh) -> Self {
        Self {
            values: na::DVector::from_iterator(
                mesh.vertex_count(),
                mesh.vertices.iter().map(|v| v.z),
            ),
        }
    }

    /// Number of values in the field.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Minimum and maximum of the finite values,
    /// or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, &v| match range {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    /// Linearly remap the field so that its finite range becomes `[-1, 1]`.
    ///
    /// Non-finite values stay NaN.
    /// A field where every finite value is the same maps to all zeros.
    pub fn normalized_symmetric(&self) -> Self {
        let unit = self.normalized_unit();
        Self {
            values: unit.values.map(|v| 2. * v - 1.),
        }
    }

    /// Linearly remap the field so that its finite range becomes `[0, 1]`.
    ///
    /// Non-finite values become NaN.
    /// A field where every finite value is the same maps to all halves.
    pub fn normalized_unit(&self) -> Self {
        let Some((min, max)) = self.finite_range() else {
            return Self {
                values: self.values.map(|_| f64::NAN),
            };
        };
        let span = max - min;
        Self {
            values: self.values.map(|v| {
                if !v.is_finite() {
                    f64::NAN
                } else if span == 0. {
                    0.5
                } else {
                    (v - min) / span
                }
            }),
        }
    }
}

/// Color a field with values in `[-1, 1]` using a color map.
///
/// Typically used with [`ScalarField::normalized_symmetric`]:
/// ```
/// # use revolver_core::{revolve_coords, RevolveParams};
/// # use revolver_visuals::{builtin_color_maps, shade, ScalarField};
/// # let mesh = revolve_coords(&[1., 1.], &[0., 1.], &RevolveParams::default()).unwrap();
/// let heights = ScalarField::heights(&mesh).normalized_symmetric();
/// let colors = shade(&heights, &builtin_color_maps::interface());
/// assert_eq!(colors.len(), mesh.vertex_count());
/// ```
pub fn shade(field: &ScalarField, map: &ColorMap) -> Vec<Color> {
    field.values.iter().map(|&v| map.color_symmetric(v)).collect()
}

/// Vertex colors for a plane built from grid data.
///
/// Uses the precomputed RGBA columns if the data has them,
/// otherwise colors the magnitude normalized to its range with the given map.
pub fn grid_colors(data: &GridData, map: &ColorMap) -> Vec<Color> {
    if let Some(colors) = &data.colors {
        let as_u8 = |channel: f64| (u8::MAX as f64 * channel.clamp(0., 1.)).round() as u8;
        return colors.iter().map(|rgba| rgba.map(as_u8)).collect();
    }

    let magnitudes = ScalarField::from_values(data.magnitudes.clone()).normalized_unit();
    magnitudes.values.iter().map(|&v| map.color(v)).collect()
}
