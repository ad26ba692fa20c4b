// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors and the cyclic gradient palette.
//!
//! The caller supplies a handful of "control" colors as hex strings.
//! The last one is set aside as the color of the set's interior; the
//! rest are stretched into a gradient by inserting `spacing` blended
//! entries between each neighbouring pair, with the final color
//! blending back into the first so the palette can be walked in a
//! circle.  A low spacing makes the bands repeat often; a high one
//! stretches them out.

use crate::error::RenderError;

/// A color with each channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Rgb {
    /// Constructor.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `#RRGGBB`, or the `#RGB` shorthand, in either case.
    pub fn from_hex(s: &str) -> Result<Self, RenderError> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let digits = match s.strip_prefix('#') {
            Some(d) if d.bytes().all(|b| b.is_ascii_hexdigit()) => d,
            _ => return Err(invalid()),
        };

        let channel = |i: usize, width: usize, scale: f64| {
            u8::from_str_radix(&digits[i * width..(i + 1) * width], 16)
                .map(|v| f64::from(v) / scale)
                .map_err(|_| invalid())
        };

        let (width, scale) = match digits.len() {
            6 => (2, 255.0),
            3 => (1, 15.0),
            _ => return Err(invalid()),
        };

        Ok(Rgb::new(
            channel(0, width, scale)?,
            channel(1, width, scale)?,
            channel(2, width, scale)?,
        ))
    }

    /// Linear per-channel interpolation: `t == 0` is `self`, `t == 1`
    /// is `other`.
    #[inline]
    pub fn blend(&self, other: &Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }

    /// Quantises to opaque 8-bit RGBA.
    #[inline]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [quantise(self.r), quantise(self.g), quantise(self.b), 255]
    }
}

#[inline]
fn quantise(channel: f64) -> u8 {
    (channel.max(0.0).min(1.0) * 255.0).round() as u8
}

/// A cyclic gradient plus the color reserved for points that never
/// escape.  Built once per render and shared read-only by every worker.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    gradient: Vec<Rgb>,
    interior: Rgb,
}

impl Palette {
    /// Builds the palette from hex control colors.  Needs at least two
    /// colors (one gradient color and the interior color) and a
    /// spacing of at least one.
    pub fn new<S: AsRef<str>>(colors: &[S], spacing: usize) -> Result<Palette, RenderError> {
        let controls = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<Rgb>, RenderError>>()?;
        Palette::from_controls(&controls, spacing)
    }

    /// As `new`, for colors that have already been parsed.
    pub fn from_controls(controls: &[Rgb], spacing: usize) -> Result<Palette, RenderError> {
        if spacing == 0 {
            return Err(RenderError::DegeneratePalette(
                "color spacing must be at least 1".to_string(),
            ));
        }

        let (interior, stops) = match controls.split_last() {
            Some((interior, stops)) if !stops.is_empty() => (*interior, stops),
            _ => {
                return Err(RenderError::DegeneratePalette(format!(
                    "need a gradient color and an interior color, got {} color(s)",
                    controls.len()
                )))
            }
        };

        let mut gradient = Vec::with_capacity(stops.len() * spacing);
        for (i, from) in stops.iter().enumerate() {
            let to = &stops[(i + 1) % stops.len()];
            gradient.extend((0..spacing).map(|k| from.blend(to, k as f64 / spacing as f64)));
        }

        Ok(Palette { gradient, interior })
    }

    /// The number of gradient entries.  Never zero.
    pub fn len(&self) -> usize {
        self.gradient.len()
    }

    /// Always false; an empty palette cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.gradient.is_empty()
    }

    /// The gradient entries, in order.
    pub fn gradient(&self) -> &[Rgb] {
        &self.gradient
    }

    /// The color given to points that never escape.
    pub fn interior(&self) -> Rgb {
        self.interior
    }

    /// Looks up a continuous position on the cyclic gradient, blending
    /// between the two neighbouring entries.  Any finite position is
    /// accepted, negative ones included.
    #[inline]
    pub fn sample(&self, position: f64) -> Rgb {
        let len = self.gradient.len();
        let i1 = (position.rem_euclid(len as f64).floor() as usize) % len;
        let i2 = (i1 + 1) % len;
        self.gradient[i1].blend(&self.gradient[i2], position.rem_euclid(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#000000"), Ok(BLACK));
        assert_eq!(Rgb::from_hex("#FFFFFF"), Ok(WHITE));
        assert_eq!(Rgb::from_hex("#fff"), Ok(WHITE));
        assert_eq!(Rgb::from_hex("#ff0000"), Ok(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(Rgb::from_hex("#0000Ff").unwrap().to_rgba8(), [0, 0, 255, 255]);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in &["", "#", "000000", "#00000", "#0000000", "#gg0000", "# 00000", "#+10000"] {
            match Rgb::from_hex(bad) {
                Err(RenderError::InvalidColor(s)) => assert_eq!(&s, bad),
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn quantisation_rounds_and_clamps() {
        assert_eq!(Rgb::new(0.5, 0.998, 0.001).to_rgba8(), [128, 254, 0, 255]);
        assert_eq!(Rgb::new(-0.5, 1.5, 1.0).to_rgba8(), [0, 255, 255, 255]);
    }

    #[test]
    fn palette_length_is_segments_times_spacing() {
        let p = Palette::new(&["#000000", "#ffffff", "#ff0000", "#00ff00"], 7).unwrap();
        assert_eq!(p.len(), 3 * 7);
        assert_eq!(p.interior(), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn gradient_interpolates_toward_next_color() {
        let p = Palette::new(&["#000000", "#FFFFFF", "#FF0000"], 10).unwrap();
        assert_eq!(p.len(), 20);
        assert_eq!(p.gradient()[0], BLACK);
        assert_eq!(p.gradient()[5], Rgb::new(0.5, 0.5, 0.5));
        let near_white = p.gradient()[9];
        assert!((near_white.r - 0.9).abs() < 1e-12);
        assert_eq!(p.gradient()[10], WHITE);
        // the last segment wraps back toward the first color
        assert!((p.gradient()[19].r - 0.1).abs() < 1e-12);
        assert_eq!(p.interior(), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn single_gradient_color_cycles_onto_itself() {
        let p = Palette::new(&["#000000", "#FFFFFF"], 10).unwrap();
        assert_eq!(p.len(), 10);
        assert!(p.gradient().iter().all(|c| *c == BLACK));
        assert_eq!(p.interior(), WHITE);
    }

    #[test]
    fn spacing_one_single_segment_is_well_formed() {
        let p = Palette::new(&["#336699", "#000000"], 1).unwrap();
        assert_eq!(p.len(), 1);
        assert!(!p.is_empty());
        let c = p.sample(12.75);
        assert_eq!(c.to_rgba8(), [0x33, 0x66, 0x99, 255]);
    }

    #[test]
    fn degenerate_palettes_rejected() {
        match Palette::new(&["#000000"], 4) {
            Err(RenderError::DegeneratePalette(_)) => (),
            other => panic!("expected DegeneratePalette, got {:?}", other),
        }
        let none: [&str; 0] = [];
        assert!(Palette::new(&none, 4).is_err());
        match Palette::new(&["#000000", "#ffffff"], 0) {
            Err(RenderError::DegeneratePalette(_)) => (),
            other => panic!("expected DegeneratePalette, got {:?}", other),
        }
    }

    #[test]
    fn bad_color_surfaces_instead_of_black() {
        assert_eq!(
            Palette::new(&["#000000", "blue", "#ffffff"], 4),
            Err(RenderError::InvalidColor("blue".to_string()))
        );
    }

    #[test]
    fn sample_wraps_in_both_directions() {
        let p = Palette::new(&["#000000", "#FFFFFF", "#FF0000"], 2).unwrap();
        // entries: black, grey, white, grey
        assert_eq!(p.sample(0.0), BLACK);
        assert_eq!(p.sample(2.0), WHITE);
        assert_eq!(p.sample(4.0), BLACK);
        assert_eq!(p.sample(-2.0), WHITE);
        let between = p.sample(3.5);
        assert!((between.r - 0.25).abs() < 1e-12);
    }
}
