//! The full path from input files to shaded surfaces.

use std::path::Path;

use revolver_core::{
    load_points, plane_mesh, revolve, stitch, GridData, GridError, LoadError, PlaneParams,
    QuadMesh, RevolveError, RevolveParams, StitchError, StitchParams, Vec2,
};
use revolver_visuals::{grid_colors, shade, Color, ColorMap, ScalarField, Surface};

/// Error in any step of building a surface.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Loading the interface failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Stitching the segments failed.
    #[error(transparent)]
    Stitch(#[from] StitchError),
    /// Revolving the profile failed.
    #[error(transparent)]
    Revolve(#[from] RevolveError),
    /// Loading grid data or building a plane from it failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parameters for building a revolved interface surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterfaceParams {
    /// How to join segments.
    pub stitch: StitchParams,
    /// How to sweep the joined profile.
    pub revolve: RevolveParams,
}

/// A mesh with one color per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShadedMesh {
    /// The geometry.
    pub mesh: QuadMesh,
    /// One color per vertex of `mesh`.
    pub colors: Vec<Color>,
}

impl ShadedMesh {
    /// View this as a [`Surface`] for emitting.
    pub fn surface<'a>(&'a self, name: &'a str) -> Surface<'a> {
        Surface {
            name,
            mesh: &self.mesh,
            colors: Some(&self.colors),
        }
    }
}

/// Stitch and revolve interface points,
/// coloring vertices by their height normalized to `[-1, 1]`.
pub fn interface_surface(
    points: &[Vec2],
    params: &InterfaceParams,
    color_map: &ColorMap,
) -> Result<ShadedMesh, PipelineError> {
    let profile = stitch(points, &params.stitch)?;
    if profile.gap_count > 0 {
        log::info!(
            "Interface has {} discontinuities between segments",
            profile.gap_count
        );
    }
    let mesh = revolve(&profile, &params.revolve)?;
    let heights = ScalarField::heights(&mesh).normalized_symmetric();
    let colors = shade(&heights, color_map);
    Ok(ShadedMesh { mesh, colors })
}

/// Load an interface file and build its revolved surface.
///
/// See [`interface_surface`].
pub fn load_interface_surface(
    path: impl AsRef<Path>,
    params: &InterfaceParams,
    color_map: &ColorMap,
) -> Result<ShadedMesh, PipelineError> {
    let points = load_points(path)?;
    if points.is_empty() {
        log::warn!("Interface file contains no points, the surface will be empty");
    }
    interface_surface(&points, params, color_map)
}

/// Build a colored plane from grid samples.
///
/// Colors come from the data if it has them,
/// otherwise from the magnitude column through the given map.
pub fn plane_surface(
    data: &GridData,
    params: &PlaneParams,
    color_map: &ColorMap,
) -> Result<ShadedMesh, PipelineError> {
    let mesh = plane_mesh(data, params)?;
    let colors = grid_colors(data, color_map);
    Ok(ShadedMesh { mesh, colors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use revolver_core::GapPolicy;
    use revolver_visuals::{builtin_color_maps, MeshBuffers, SurfaceEmitter, TRANSPARENT};

    fn interface_text() -> &'static str {
        // two connected segments, a jump, and one more segment
        "0 0.5\n0.5 0.5\n\n0.5 0.5\n1 0.25\n\n2 1\n2.5 1\n"
    }

    #[test]
    fn interface_to_buffers() {
        let points = revolver_core::parse_points(interface_text()).unwrap();
        let params = InterfaceParams {
            revolve: RevolveParams {
                steps: 8,
                gaps: GapPolicy::Skip,
            },
            ..Default::default()
        };
        let shaded =
            interface_surface(&points, &params, &builtin_color_maps::interface()).unwrap();

        // 6 points plus a 2-entry gap marker
        assert_eq!(shaded.mesh.vertex_count(), 8 * 8);
        assert_eq!(shaded.colors.len(), shaded.mesh.vertex_count());
        // edges 3-4, 4-5 and 5-6 touch the gap
        assert_eq!(shaded.mesh.face_count(), 7 * (7 - 3));
        assert_eq!(shaded.colors[4], TRANSPARENT);

        let mut buffers = MeshBuffers::default();
        buffers.emit(&shaded.surface("interface")).unwrap();
        let surf = &buffers.surfaces[0];
        assert_eq!(surf.vertices.len(), 64);
        // lowest point of the interface at the start of the sweep
        assert_relative_eq!(surf.vertices[0][2], 0.);
        assert_eq!(surf.colors[0], [8, 65, 123, 255]);
    }

    #[test]
    fn errors_propagate() {
        let points = revolver_core::parse_points("0 0\n1 1\n2 2\n").unwrap();
        let res = interface_surface(
            &points,
            &InterfaceParams::default(),
            &builtin_color_maps::interface(),
        );
        assert!(matches!(res, Err(PipelineError::Stitch(_))));

        let points = revolver_core::parse_points(interface_text()).unwrap();
        let params = InterfaceParams {
            revolve: RevolveParams {
                steps: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let res = interface_surface(&points, &params, &builtin_color_maps::interface());
        assert!(matches!(
            res,
            Err(PipelineError::Revolve(RevolveError::TooFewSteps(1)))
        ));

        let missing = std::env::temp_dir().join("revolver-no-such-interface.dat");
        let res = load_interface_surface(
            &missing,
            &InterfaceParams::default(),
            &builtin_color_maps::interface(),
        );
        assert!(matches!(res, Err(PipelineError::Load(_))));
    }

    #[test]
    fn plane_with_heatmap() {
        let data = GridData::parse("0 0 0\n1 0 1\n0 1 2\n1 1 3\n").unwrap();
        let shaded = plane_surface(
            &data,
            &PlaneParams::default(),
            &builtin_color_maps::heatmap(),
        )
        .unwrap();
        assert_eq!(shaded.mesh.face_count(), 1);
        assert_eq!(shaded.colors[0], [0, 0, 255, 255]);
        assert_eq!(shaded.colors[3], [255, 0, 0, 255]);
    }
}
