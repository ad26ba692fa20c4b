// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration.
//!
//! A point `c` is iterated as `z = z * z + c` from zero until `|z|`
//! reaches 2 or the iteration cap runs out.  The integer count at
//! which a point escapes produces visible bands when used as a color
//! index; feeding the magnitude at the escape step through a double
//! logarithm gives a fractional count that varies continuously across
//! the band boundaries.  That fractional count is the position on the
//! cyclic palette.

use num::Complex;

use crate::palette::{Palette, Rgb};

/// The outcome of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The point escaped; the value is the smoothed iteration count.
    Escaped(f64),
    /// The point was still bounded when the cap was reached.
    Interior,
}

/// Colors points of the complex plane.  Holds only shared references,
/// so a single evaluator can be handed to every worker.
#[derive(Copy, Clone, Debug)]
pub struct EscapeEvaluator<'a> {
    palette: &'a Palette,
    max_iterations: usize,
}

impl<'a> EscapeEvaluator<'a> {
    /// Constructor.  `max_iterations` is the number of steps after
    /// which a point is presumed to be inside the set.
    pub fn new(palette: &'a Palette, max_iterations: usize) -> Self {
        EscapeEvaluator {
            palette,
            max_iterations,
        }
    }

    /// The iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Iterates `point` and returns its smoothed escape count, if it
    /// has one.
    pub fn iterate(&self, point: Complex<f64>) -> Escape {
        let (mut x, mut y) = (0.0_f64, 0.0_f64);
        let (mut x_square, mut y_square) = (0.0_f64, 0.0_f64);
        let mut iteration = 0;

        // (x + y)^2 - x^2 - y^2 == 2xy
        while x_square + y_square < 4.0 && iteration < self.max_iterations {
            y = (x + y) * (x + y) - x_square - y_square + point.im;
            x = x_square - y_square + point.re;
            x_square = x * x;
            y_square = y * y;
            iteration += 1;
        }

        if iteration >= self.max_iterations {
            return Escape::Interior;
        }

        let nu = ((x_square + y_square).ln() / 2.0 / std::f64::consts::LN_2).ln()
            / std::f64::consts::LN_2;
        Escape::Escaped(iteration as f64 + 1.0 - nu)
    }

    /// The color of `point`: its position on the gradient if it
    /// escaped, the palette's interior color otherwise.
    #[inline]
    pub fn color(&self, point: Complex<f64>) -> Rgb {
        match self.iterate(point) {
            Escape::Escaped(smoothed) => self.palette.sample(smoothed),
            Escape::Interior => self.palette.interior(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_ITERATIONS;

    fn palette() -> Palette {
        Palette::new(&["#000000", "#ffffff", "#ff8000", "#123456"], 8).unwrap()
    }

    #[test]
    fn origin_never_escapes() {
        let p = palette();
        let e = EscapeEvaluator::new(&p, DEFAULT_MAX_ITERATIONS);
        assert_eq!(e.iterate(Complex::new(0.0, 0.0)), Escape::Interior);
        assert_eq!(e.color(Complex::new(0.0, 0.0)), p.interior());
    }

    #[test]
    fn origin_is_interior_for_any_palette() {
        for colors in &[vec!["#000000", "#ff0000"], vec!["#abcdef", "#fedcba", "#00ff00"]] {
            let p = Palette::new(colors, 3).unwrap();
            let e = EscapeEvaluator::new(&p, 100);
            assert_eq!(e.color(Complex::new(0.0, 0.0)), p.interior());
        }
    }

    #[test]
    fn far_point_escapes_after_one_step() {
        let p = palette();
        let e = EscapeEvaluator::new(&p, DEFAULT_MAX_ITERATIONS);
        // One step lands on 2+2i, |z|^2 = 8.  nu = log2(log2(8) / 2) = log2(1.5).
        let expected = 2.0 - 1.5_f64.log2();
        match e.iterate(Complex::new(2.0, 2.0)) {
            Escape::Escaped(smoothed) => assert!((smoothed - expected).abs() < 1e-12),
            Escape::Interior => panic!("2+2i should escape"),
        }
    }

    #[test]
    fn escaped_color_comes_from_gradient() {
        let p = palette();
        let e = EscapeEvaluator::new(&p, DEFAULT_MAX_ITERATIONS);
        let c = Complex::new(2.0, 2.0);
        match e.iterate(c) {
            Escape::Escaped(s) => assert_eq!(e.color(c), p.sample(s)),
            Escape::Interior => panic!("2+2i should escape"),
        }
    }

    #[test]
    fn very_distant_points_still_get_a_color() {
        let p = palette();
        let e = EscapeEvaluator::new(&p, DEFAULT_MAX_ITERATIONS);
        // The smoothed count goes negative out here.
        match e.iterate(Complex::new(1.0e10, -1.0e10)) {
            Escape::Escaped(s) => assert!(s < 0.0),
            Escape::Interior => panic!("should escape"),
        }
        let color = e.color(Complex::new(1.0e10, -1.0e10));
        for channel in &[color.r, color.g, color.b] {
            assert!(*channel >= 0.0 && *channel <= 1.0);
        }
    }

    #[test]
    fn cap_decides_boundary_points() {
        let p = palette();
        // -0.75+0.1i escapes, but slowly.
        let c = Complex::new(-0.75, 0.1);
        let capped = EscapeEvaluator::new(&p, 5);
        assert_eq!(capped.max_iterations(), 5);
        assert_eq!(capped.iterate(c), Escape::Interior);
        match EscapeEvaluator::new(&p, DEFAULT_MAX_ITERATIONS).iterate(c) {
            Escape::Escaped(s) => assert!(s > 5.0),
            Escape::Interior => panic!("should escape under the default cap"),
        }
    }

    #[test]
    fn smoothed_count_is_continuous_across_bands() {
        let p = palette();
        let e = EscapeEvaluator::new(&p, DEFAULT_MAX_ITERATIONS);
        let mut last: Option<f64> = None;
        let mut re = 0.30;
        while re < 0.40 {
            if let Escape::Escaped(s) = e.iterate(Complex::new(re, 0.0)) {
                if let Some(prev) = last {
                    assert!((s - prev).abs() < 2.0, "jump at {}: {} -> {}", re, prev, s);
                }
                last = Some(s);
            }
            re += 0.001;
        }
    }
}
