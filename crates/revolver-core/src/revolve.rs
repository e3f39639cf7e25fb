//! Sweeping a profile curve around the axis of symmetry.
//!
//! The profile is rotated about the `z` axis through half a turn,
//! from angle 0 (the `+x` side) to π (the `-x` side),
//! giving an open half-shell that shows the interior
//! of an axisymmetric interface when viewed from the front.

use fixedbitset as fb;
use itertools::{iproduct, izip};
use std::f64::consts::PI;

use crate::{stitch::Profile, Face, QuadMesh, Vec3};

/// Error in revolving a profile.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RevolveError {
    /// At least two angular steps are needed to span the half-turn.
    #[error("Revolution needs at least 2 angular steps, got {0}")]
    TooFewSteps(usize),
    /// The radius and height sequences didn't line up.
    #[error("Mismatched profile lengths: {radii} radii, {heights} heights")]
    MismatchedLengths {
        /// Number of radii given.
        radii: usize,
        /// Number of heights given.
        heights: usize,
    },
    /// The profile contained gap markers and [`GapPolicy::Reject`] was requested.
    #[error("Profile contains {0} non-finite entries")]
    GapInProfile(usize),
}

/// How to treat gap markers (NaN entries) in the profile.
///
/// Regardless of the policy, the vertex buffer always contains
/// `steps * profile.len()` vertices, so vertex indices stay predictable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GapPolicy {
    /// Revolve the gap markers like any other point.
    ///
    /// Their vertices get NaN coordinates and faces touching them are still emitted.
    /// Renderers generally discard such faces,
    /// but mesh file consumers may not.
    #[default]
    Propagate,
    /// Emit vertices for gap markers but leave out every face that uses one.
    Skip,
    /// Fail with [`RevolveError::GapInProfile`] if the profile has any gaps.
    Reject,
}

/// Parameters for [`revolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevolveParams {
    /// Number of angular positions the profile is copied to,
    /// including both ends of the half-turn.
    pub steps: usize,
    /// What to do with gap markers.
    pub gaps: GapPolicy,
}

impl Default for RevolveParams {
    fn default() -> Self {
        Self {
            steps: 64,
            gaps: GapPolicy::default(),
        }
    }
}

/// Revolve a stitched profile into a quad mesh.
///
/// See [`revolve_coords`] for the layout of the result.
pub fn revolve(profile: &Profile, params: &RevolveParams) -> Result<QuadMesh, RevolveError> {
    revolve_coords(&profile.radii, &profile.heights, params)
}

/// Revolve a profile given as separate radius and height sequences.
///
/// Vertex `i` of the profile at angular step `k` ends up at index `k * n + i`,
/// where `n` is the length of the profile,
/// and is positioned at `(r cos θ, r sin θ, h)` with `θ = π k / (steps - 1)`.
/// Every pair of neighboring profile points and neighboring steps
/// is connected by one quad.
///
/// ```
/// # use revolver_core::{revolve_coords, RevolveParams};
/// let params = RevolveParams { steps: 64, ..Default::default() };
/// let mesh = revolve_coords(&[1., 1.], &[0., 1.], &params).unwrap();
/// assert_eq!(mesh.vertex_count(), 128);
/// assert_eq!(mesh.face_count(), 63);
/// ```
pub fn revolve_coords(
    radii: &[f64],
    heights: &[f64],
    params: &RevolveParams,
) -> Result<QuadMesh, RevolveError> {
    if radii.len() != heights.len() {
        return Err(RevolveError::MismatchedLengths {
            radii: radii.len(),
            heights: heights.len(),
        });
    }
    if params.steps < 2 {
        return Err(RevolveError::TooFewSteps(params.steps));
    }

    let n = radii.len();
    let steps = params.steps;

    let gaps = fb::FixedBitSet::from_iter(
        izip!(radii, heights)
            .enumerate()
            .filter(|(_, (r, h))| !r.is_finite() || !h.is_finite())
            .map(|(i, _)| i),
    );
    let gap_count = gaps.count_ones(..);
    if gap_count > 0 {
        match params.gaps {
            GapPolicy::Reject => return Err(RevolveError::GapInProfile(gap_count)),
            GapPolicy::Propagate => log::warn!(
                "Profile has {gap_count} non-finite entries, these will produce NaN geometry"
            ),
            GapPolicy::Skip => {
                log::debug!("Skipping faces around {gap_count} non-finite profile entries")
            }
        }
    }

    let mut vertices: Vec<Vec3> = Vec::with_capacity(steps * n);
    for step in 0..steps {
        let angle = PI * step as f64 / (steps - 1) as f64;
        let (sin, cos) = angle.sin_cos();
        vertices.extend(izip!(radii, heights).map(|(&r, &h)| Vec3::new(r * cos, r * sin, h)));
    }

    let skip_gaps = params.gaps == GapPolicy::Skip;
    let faces: Vec<Face> = iproduct!(0..steps - 1, 0..n.saturating_sub(1))
        .filter(|&(_, i)| !(skip_gaps && (gaps.contains(i) || gaps.contains(i + 1))))
        .map(|(step, i)| {
            let curr = step * n + i;
            let next = (step + 1) * n + i;
            [curr, curr + 1, next + 1, next]
        })
        .collect();

    log::debug!(
        "Revolved a profile of {n} points in {steps} steps into {} vertices and {} faces",
        vertices.len(),
        faces.len()
    );
    Ok(QuadMesh { vertices, faces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stitch, StitchParams, Vec2};
    use approx::assert_abs_diff_eq;

    #[test]
    fn buffer_sizes() {
        let params = RevolveParams::default();
        let mesh = revolve_coords(&[1., 1.], &[0., 1.], &params).unwrap();
        assert_eq!(mesh.vertex_count(), 128);
        assert_eq!(mesh.face_count(), 63);

        let mesh = revolve_coords(&[1., 2., 3., 4., 5.], &[0.; 5], &params).unwrap();
        assert_eq!(mesh.vertex_count(), 64 * 5);
        assert_eq!(mesh.face_count(), 63 * 4);
    }

    #[test]
    fn degenerate_profiles_have_no_faces() {
        let params = RevolveParams::default();
        let single = revolve_coords(&[1.], &[1.], &params).unwrap();
        assert_eq!(single.vertex_count(), 64);
        assert_eq!(single.face_count(), 0);

        let empty = revolve_coords(&[], &[], &params).unwrap();
        assert_eq!(empty, QuadMesh::default());
    }

    #[test]
    fn first_and_last_steps() {
        let radii = [0.5, 1.5, 2.0];
        let heights = [-1.0, 0.25, 3.0];
        let params = RevolveParams {
            steps: 16,
            ..Default::default()
        };
        let mesh = revolve_coords(&radii, &heights, &params).unwrap();
        let n = radii.len();

        for i in 0..n {
            // angle 0 reproduces the profile in the xz plane exactly
            assert_eq!(mesh.vertices[i], Vec3::new(radii[i], 0., heights[i]));

            // angle π mirrors it to the negative x side
            let last = mesh.vertices[(params.steps - 1) * n + i];
            assert_eq!(last.x, -radii[i]);
            assert_abs_diff_eq!(last.y, 0., epsilon = 1e-12);
            assert_eq!(last.z, heights[i]);
        }

        // halfway between, the profile sits on the y axis
        let params = RevolveParams {
            steps: 3,
            ..Default::default()
        };
        let mesh = revolve_coords(&radii, &heights, &params).unwrap();
        for i in 0..n {
            let mid = mesh.vertices[n + i];
            assert_abs_diff_eq!(mid.x, 0., epsilon = 1e-12);
            assert_abs_diff_eq!(mid.y, radii[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn radius_is_preserved() {
        let params = RevolveParams {
            steps: 9,
            ..Default::default()
        };
        let mesh = revolve_coords(&[2.0, 3.0], &[0.0, 1.0], &params).unwrap();
        for (idx, v) in mesh.vertices.iter().enumerate() {
            let expected = if idx % 2 == 0 { 2.0 } else { 3.0 };
            assert_abs_diff_eq!(v.xy().norm(), expected, epsilon = 1e-12);
            // sweep stays in the upper half plane
            assert!(v.y >= 0.0);
        }
    }

    #[test]
    fn face_connectivity() {
        let params = RevolveParams {
            steps: 3,
            ..Default::default()
        };
        let mesh = revolve_coords(&[1., 1., 1.], &[0., 1., 2.], &params).unwrap();
        assert_eq!(
            mesh.faces,
            vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]]
        );
    }

    #[test]
    fn stitched_example() {
        let points = [
            Vec2::new(1., 0.),
            Vec2::new(1., 1.),
            Vec2::new(2., 1.),
            Vec2::new(2., 2.),
        ];
        let profile = stitch(&points, &StitchParams::default()).unwrap();
        assert_eq!(profile.gap_count, 0);

        let params = RevolveParams {
            steps: 2,
            ..Default::default()
        };
        let mesh = revolve(&profile, &params).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.vertices[1], Vec3::new(1., 0., 1.));
        assert_eq!(mesh.vertices[4 + 3].x, -2.);
    }

    fn gapped_profile() -> Profile {
        let points = crate::parse_points(include_str!("interface/test_interface.dat")).unwrap();
        stitch(&points, &StitchParams::default()).unwrap()
    }

    #[test]
    fn propagated_gaps_become_nan_vertices() {
        let profile = gapped_profile();
        let params = RevolveParams {
            steps: 4,
            gaps: GapPolicy::Propagate,
        };
        let mesh = revolve(&profile, &params).unwrap();
        assert_eq!(mesh.vertex_count(), 4 * profile.len());
        assert_eq!(mesh.face_count(), 3 * (profile.len() - 1));
        assert_eq!(mesh.non_finite_vertex_count(), 4 * 2);
    }

    #[test]
    fn skipped_gaps_have_no_faces() {
        let profile = gapped_profile();
        let params = RevolveParams {
            steps: 4,
            gaps: GapPolicy::Skip,
        };
        let mesh = revolve(&profile, &params).unwrap();
        assert_eq!(mesh.vertex_count(), 4 * profile.len());
        // profile entries 6 and 7 are the gap,
        // so edges 5-6, 6-7 and 7-8 produce no faces
        assert_eq!(mesh.face_count(), 3 * (profile.len() - 1 - 3));
        for corners in mesh.face_vertices() {
            for c in corners {
                assert!(c.iter().all(|x| x.is_finite()), "face touches a gap: {c:?}");
            }
        }
    }

    #[test]
    fn rejected_gaps() {
        let profile = gapped_profile();
        let params = RevolveParams {
            steps: 4,
            gaps: GapPolicy::Reject,
        };
        assert_eq!(
            revolve(&profile, &params),
            Err(RevolveError::GapInProfile(2))
        );
    }

    #[test]
    fn invalid_parameters() {
        for steps in [0, 1] {
            let params = RevolveParams {
                steps,
                ..Default::default()
            };
            assert_eq!(
                revolve_coords(&[1., 2.], &[0., 0.], &params),
                Err(RevolveError::TooFewSteps(steps))
            );
        }
        assert_eq!(
            revolve_coords(&[1., 2.], &[0.], &RevolveParams::default()),
            Err(RevolveError::MismatchedLengths {
                radii: 2,
                heights: 1
            })
        );
    }
}
