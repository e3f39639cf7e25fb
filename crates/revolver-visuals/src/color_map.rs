//! Color maps for colorizing vertex data.

use itertools::izip;

/// Colors are represented as 8-bit RGBA **in sRGB space**,
/// which is what mesh file formats expect for vertex colors.
pub type Color = [u8; 4];
pub(crate) const LUT_SIZE: usize = 256;

/// Color given to values that can't be mapped (NaN),
/// so that geometry built from gap markers is invisible.
pub const TRANSPARENT: Color = [0, 0, 0, 0];

/// A map determining how to colorize data.
#[derive(Clone, Debug)]
pub struct ColorMap {
    /// Name used to select the map, e.g. from the command line.
    pub name: String,
    /// The color map expressed as a lookup table.
    pub(crate) lut: [Color; LUT_SIZE],
}

impl ColorMap {
    /// Create a color map from an [`enterpolation`] curve
    /// interpolating [`palette`] colors.
    pub fn from_curve<Curve, C>(name: String, curve: Curve) -> Self
    where
        C: palette::IntoColor<palette::Srgb>,
        Curve: enterpolation::Curve<f32, Output = C>,
    {
        let vals = curve.take(LUT_SIZE);
        let mut lut = [[0; 4]; LUT_SIZE];
        for (color, lut_val) in izip!(vals, lut.iter_mut()) {
            let srgb: palette::Srgb = color.into_color();
            let as_u8 = |channel: f32| (u8::MAX as f32 * channel.clamp(0., 1.)).round() as u8;
            *lut_val = [as_u8(srgb.red), as_u8(srgb.green), as_u8(srgb.blue), u8::MAX];
        }
        Self { name, lut }
    }

    /// Create a color map from a function
    /// that takes a float value between 0 and 1 and returns a color.
    pub fn from_fn(name: String, curve: impl Fn(f32) -> Color) -> Self {
        // minus one because we have LUT_SIZE points
        // and thus (LUT_SIZE-1) gaps between points in the interval
        let increment = 1.0 / (LUT_SIZE - 1) as f32;
        Self {
            name,
            lut: std::array::from_fn(|i| curve(increment * i as f32)),
        }
    }

    /// Look up the color for a value in `[0, 1]`.
    ///
    /// Values outside the range are clamped to it.
    /// NaN maps to [`TRANSPARENT`].
    pub fn color(&self, t: f64) -> Color {
        if t.is_nan() {
            return TRANSPARENT;
        }
        let idx = (t.clamp(0., 1.) * (LUT_SIZE - 1) as f64).round() as usize;
        self.lut[idx]
    }

    /// Look up the color for a value in `[-1, 1]`.
    pub fn color_symmetric(&self, v: f64) -> Color {
        self.color(0.5 * (v + 1.))
    }
}

pub mod builtin_color_maps {
    //! A collection of premade color maps.
    //!
    //! Contains the following maps:
    //! - [`interface`]
    //! - [`heatmap`]
    //! - [`sunset`]

    use super::{Color, ColorMap};
    use enterpolation::linear::ConstEquidistantLinear;
    use palette::{FromColor, LinSrgb, Oklab, Srgb};

    /// Convert a color given as an sRGB hexadecimal code in 0xRRGGBB format
    /// to linear RGB.
    fn srgb_hex(val: u32) -> LinSrgb {
        let srgb_u8 = Srgb::from(val);
        srgb_u8.into_format::<f32>().into_linear()
    }

    /// Convert floating point sRGB values to an Oklab color.
    fn srgb_float(r: f32, g: f32, b: f32) -> Oklab {
        Oklab::from_color(Srgb::new(r, g, b))
    }

    /// Look up a builtin map by name.
    pub fn by_name(name: &str) -> Option<ColorMap> {
        all_builtins().into_iter().find(|m| m.name == name)
    }

    /// A collection of all builtin color maps.
    pub fn all_builtins() -> Vec<ColorMap> {
        vec![interface(), heatmap(), sunset()]
    }

    /// Two-point gradient used to color revolved interfaces by height,
    /// from deep blue at the bottom to red at the top.
    ///
    /// The endpoints are exactly `#08417b` and `#ff0000`,
    /// blended linearly in linear RGB in between.
    pub fn interface() -> ColorMap {
        ColorMap::from_curve(
            "interface".to_string(),
            ConstEquidistantLinear::equidistant_unchecked([srgb_hex(0x08417b), srgb_hex(0xff0000)]),
        )
    }

    /// Simple blue-to-red heatmap with the red and blue channels
    /// directly proportional to the value.
    pub fn heatmap() -> ColorMap {
        let as_u8 = |channel: f32| (u8::MAX as f32 * channel).round() as u8;
        ColorMap::from_fn("heatmap".to_string(), |t| -> Color {
            [as_u8(t), 0, as_u8(1. - t), u8::MAX]
        })
    }

    /// A perceptually uniform map from dark blue to bright yellow.
    pub fn sunset() -> ColorMap {
        // interpolated in Oklab for perceptual uniformity
        ColorMap::from_curve(
            "sunset".to_string(),
            ConstEquidistantLinear::equidistant_unchecked([
                srgb_float(0.00, 0.05, 0.20),
                srgb_float(0.70, 0.10, 0.20),
                srgb_float(0.95, 0.90, 0.30),
            ]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_gradient_endpoints() {
        let map = builtin_color_maps::interface();
        assert_eq!(map.color_symmetric(-1.), [8, 65, 123, 255]);
        assert_eq!(map.color_symmetric(1.), [255, 0, 0, 255]);
        // clamped outside the range
        assert_eq!(map.color_symmetric(-5.), [8, 65, 123, 255]);
        assert_eq!(map.color(7.), [255, 0, 0, 255]);

        // blended in between, red increasing and blue decreasing
        let mid = map.color_symmetric(0.);
        assert!(mid[0] > 8 && mid[0] < 255, "{mid:?}");
        assert!(mid[2] > 0 && mid[2] < 123, "{mid:?}");
    }

    #[test]
    fn nan_is_transparent() {
        for map in builtin_color_maps::all_builtins() {
            assert_eq!(map.color(f64::NAN), TRANSPARENT, "map {}", map.name);
        }
    }

    #[test]
    fn heatmap_channels() {
        let map = builtin_color_maps::heatmap();
        assert_eq!(map.color(0.), [0, 0, 255, 255]);
        assert_eq!(map.color(1.), [255, 0, 0, 255]);
        let mid = map.color(0.5);
        assert_eq!(mid[1], 0);
        assert!((mid[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn lookup_by_name() {
        assert!(builtin_color_maps::by_name("sunset").is_some());
        assert!(builtin_color_maps::by_name("no such map").is_none());
    }
}
