//! Stitching loose line segments into a profile curve.
//!
//! Interface extraction emits the curve as a soup of line segments,
//! two points each, in an order that mostly follows the curve
//! but jumps wherever the interface breaks up (e.g. around droplets).
//! [`stitch`] flattens the segments into a single polyline
//! and marks every jump with a gap so that it isn't bridged by geometry.

use itertools::Itertools;

use crate::Vec2;

/// Error in stitching segments into a profile.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StitchError {
    /// Segments are pairs of points, so an odd count means the data is truncated or corrupt.
    #[error("Odd number of interface points ({0}), expected pairs of segment endpoints")]
    OddPointCount(usize),
    /// The continuity tolerance was negative or NaN.
    #[error("Invalid continuity tolerance {0}")]
    InvalidTolerance(f64),
}

/// Which input column holds which coordinate of the profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisConvention {
    /// The first column is the axial coordinate (height along the symmetry axis)
    /// and the second is the radius.
    ///
    /// This is how axisymmetric solvers usually lay out their output,
    /// with `x` along the axis of symmetry.
    #[default]
    AxialFirst,
    /// The first column is the radius and the second is the height.
    RadialFirst,
}

impl AxisConvention {
    /// Split a point into `(radius, height)` according to the convention.
    #[inline]
    pub fn radius_height(self, p: Vec2) -> (f64, f64) {
        match self {
            Self::AxialFirst => (p.y, p.x),
            Self::RadialFirst => (p.x, p.y),
        }
    }
}

/// Parameters for [`stitch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StitchParams {
    /// Largest per-coordinate difference at which the end of one segment
    /// and the start of the next are still considered the same point.
    ///
    /// The default of zero requires the endpoints to be bit-for-bit equal.
    /// This works for facets written by a single extraction pass,
    /// but a small positive value is more robust for data that has been
    /// written with limited precision or transformed on the way.
    pub tolerance: f64,
    /// Column layout of the input points.
    pub axes: AxisConvention,
}

impl Default for StitchParams {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            axes: AxisConvention::default(),
        }
    }
}

/// A profile curve ready to be revolved.
///
/// `radii` and `heights` are positionally aligned.
/// Breaks in the curve are marked by two consecutive entries of NaN in both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    /// Distance of each point from the axis of revolution.
    pub radii: Vec<f64>,
    /// Position of each point along the axis of revolution.
    pub heights: Vec<f64>,
    /// Number of gap markers inserted while stitching.
    pub gap_count: usize,
}

impl Profile {
    /// Number of entries in the profile, including gap markers.
    #[inline]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// Whether the profile has no entries at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Whether the entry at the given index is part of a gap marker.
    #[inline]
    pub fn is_gap(&self, idx: usize) -> bool {
        self.radii[idx].is_nan() || self.heights[idx].is_nan()
    }

    fn push(&mut self, radius: f64, height: f64) {
        self.radii.push(radius);
        self.heights.push(height);
    }

    fn push_gap(&mut self) {
        self.push(f64::NAN, f64::NAN);
        self.push(f64::NAN, f64::NAN);
        self.gap_count += 1;
    }
}

/// Stitch a sequence of segment endpoints into a profile.
///
/// Points are taken in pairs, each pair being one segment.
/// Whenever a segment doesn't start where the previous one ended
/// (within [`StitchParams::tolerance`]),
/// a gap marker is inserted between them.
///
/// ```
/// # use revolver_core::{stitch, StitchParams, Vec2};
/// let points = [
///     Vec2::new(1., 0.), Vec2::new(1., 1.),
///     Vec2::new(2., 1.), Vec2::new(2., 2.),
/// ];
/// let profile = stitch(&points, &StitchParams::default()).unwrap();
/// assert_eq!(profile.radii, vec![0., 1., 1., 2.]);
/// assert_eq!(profile.heights, vec![1., 1., 2., 2.]);
/// assert_eq!(profile.gap_count, 0);
/// ```
pub fn stitch(points: &[Vec2], params: &StitchParams) -> Result<Profile, StitchError> {
    if points.len() % 2 != 0 {
        return Err(StitchError::OddPointCount(points.len()));
    }
    if params.tolerance.is_nan() || params.tolerance < 0.0 {
        return Err(StitchError::InvalidTolerance(params.tolerance));
    }

    let mut profile = Profile {
        radii: Vec::with_capacity(points.len()),
        heights: Vec::with_capacity(points.len()),
        gap_count: 0,
    };

    let mut prev_end: Option<Vec2> = None;
    for (&start, &end) in points.iter().tuples() {
        if let Some(prev_end) = prev_end {
            if !coincide(prev_end, start, params.tolerance) {
                profile.push_gap();
            }
        }
        for p in [start, end] {
            let (r, h) = params.axes.radius_height(p);
            profile.push(r, h);
        }
        prev_end = Some(end);
    }

    log::debug!(
        "Stitched {} segments into a profile of {} entries with {} gaps",
        points.len() / 2,
        profile.len(),
        profile.gap_count
    );
    Ok(profile)
}

/// Check whether two points are the same within a per-coordinate tolerance.
/// With zero tolerance this is exact equality.
#[inline]
fn coincide(a: Vec2, b: Vec2, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Vec2> {
        coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    #[test]
    fn continuous_segments_have_no_gaps() {
        let points = pts(&[(1., 0.), (1., 1.), (1., 1.), (2., 1.), (2., 1.), (1., 0.)]);
        let profile = stitch(&points, &StitchParams::default()).unwrap();
        assert_eq!(profile.len(), points.len());
        assert_eq!(profile.gap_count, 0);
        assert!((0..profile.len()).all(|i| !profile.is_gap(i)));
    }

    #[test]
    fn gap_inserted_between_disjoint_segments() {
        let points = crate::parse_points(include_str!("interface/test_interface.dat")).unwrap();
        let profile = stitch(&points, &StitchParams::default()).unwrap();

        assert_eq!(profile.gap_count, 1);
        assert_eq!(profile.len(), points.len() + 2);
        assert_eq!(profile.radii.len(), profile.heights.len());
        // three connected segments, then the marker, then the last segment
        for i in 0..6 {
            assert!(!profile.is_gap(i), "entry {i} shouldn't be a gap");
        }
        assert!(profile.radii[6].is_nan() && profile.radii[7].is_nan());
        assert!(profile.heights[6].is_nan() && profile.heights[7].is_nan());
        assert_eq!(profile.radii[8], 1.);
        assert_eq!(profile.heights[8], 1.5);
    }

    #[test]
    fn exact_comparison_by_default() {
        let points = pts(&[(0., 0.), (0., 1.), (1e-12, 1.), (0., 2.)]);
        let exact = stitch(&points, &StitchParams::default()).unwrap();
        assert_eq!(exact.gap_count, 1);

        let tolerant = stitch(
            &points,
            &StitchParams {
                tolerance: 1e-9,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(tolerant.gap_count, 0);
        assert_eq!(tolerant.len(), 4);
    }

    #[test]
    fn radial_first_keeps_columns() {
        let points = pts(&[(1., 0.), (1., 1.), (2., 1.), (2., 2.)]);
        let params = StitchParams {
            axes: AxisConvention::RadialFirst,
            ..Default::default()
        };
        let profile = stitch(&points, &params).unwrap();
        // second segment starts at (2,1) but the first ended at (1,1)
        assert_eq!(profile.gap_count, 1);
        assert_eq!(profile.radii[..2], [1., 1.]);
        assert_eq!(profile.heights[..2], [0., 1.]);
        assert_eq!(profile.radii[4..], [2., 2.]);
    }

    #[test]
    fn output_never_shorter_than_input() {
        let points = pts(&[
            (0., 0.),
            (0., 1.),
            (5., 5.),
            (5., 6.),
            (9., 9.),
            (9., 10.),
        ]);
        let profile = stitch(&points, &StitchParams::default()).unwrap();
        assert_eq!(profile.gap_count, 2);
        assert_eq!(profile.len(), points.len() + 2 * profile.gap_count);
    }

    #[test]
    fn invalid_inputs() {
        let points = pts(&[(0., 0.), (0., 1.), (1., 1.)]);
        assert_eq!(
            stitch(&points, &StitchParams::default()),
            Err(StitchError::OddPointCount(3))
        );

        let bad_tol = StitchParams {
            tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            stitch(&[], &bad_tol),
            Err(StitchError::InvalidTolerance(_))
        ));
        let nan_tol = StitchParams {
            tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(stitch(&[], &nan_tol).is_err());

        assert!(stitch(&[], &StitchParams::default()).unwrap().is_empty());
    }
}
