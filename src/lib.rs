#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smooth-coloured Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points on the complex plane that
//! stay bounded when repeatedly squared and added back to themselves.
//! Points outside the set fly off to infinity, and how quickly they
//! do so is what gives the classic images their color.  This crate
//! renders a window onto the plane, picked out by a center point and a
//! zoom factor, into an RGBA8888 buffer.  The escape counts are
//! smoothed so that the colors flow continuously instead of forming
//! bands, and are looked up on a cyclic gradient built from a short
//! list of hex colors, the last of which paints the set's interior.
//!
//! All the arguments are validated before any work starts.  The
//! pixels are then colored by a fixed-size pool of threads, one row
//! (or column) at a time, and the finished buffer is returned only
//! when every row is done.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod config;
pub mod error;
pub mod escape;
pub mod palette;
pub mod pixels;
pub mod planes;
pub mod scheduler;

pub use config::{Decomposition, RenderConfig, DEFAULT_MAX_ITERATIONS};
pub use error::RenderError;
pub use escape::{Escape, EscapeEvaluator};
pub use palette::{Palette, Rgb};
pub use pixels::PixelBuffer;
pub use planes::{PlaneMapper, Viewport};

use log::debug;
use num::Complex;

/// Renders the Mandelbrot set with the default configuration.
///
/// `width` and `height` are the size of the image in pixels, `center`
/// is the point in the middle of the image, and `zoom` is the
/// magnification; at a zoom of 1 the image spans 3 units of the real
/// axis and 2 of the imaginary one.  `colors` are `#RRGGBB` strings;
/// the last is the interior color and the rest form the gradient.
/// `spacing` is the number of palette entries between neighbouring
/// gradient colors.
pub fn render<S: AsRef<str>>(
    width: u32,
    height: u32,
    center: Complex<f64>,
    zoom: f64,
    colors: &[S],
    spacing: usize,
) -> Result<PixelBuffer, RenderError> {
    render_with(
        width,
        height,
        center,
        zoom,
        colors,
        spacing,
        &RenderConfig::default(),
    )
}

/// As `render`, with an explicit configuration.
pub fn render_with<S: AsRef<str>>(
    width: u32,
    height: u32,
    center: Complex<f64>,
    zoom: f64,
    colors: &[S],
    spacing: usize,
    config: &RenderConfig,
) -> Result<PixelBuffer, RenderError> {
    config.validate()?;
    let viewport = Viewport::new(width, height, center, zoom)?;
    let palette = Palette::new(colors, spacing)?;

    let mapper = PlaneMapper::new(&viewport);
    let evaluator = EscapeEvaluator::new(&palette, config.max_iterations);

    debug!(
        "rendering {}x{} from {} spanning {}, {} palette entries, {} iterations, {} threads by {:?}",
        width,
        height,
        mapper.origin(),
        mapper.span(),
        palette.len(),
        evaluator.max_iterations(),
        config.threads,
        config.decomposition
    );

    match config.decomposition {
        Decomposition::Rows => scheduler::render_rows(&mapper, &evaluator, config.threads),
        Decomposition::Columns => scheduler::render_columns(&mapper, &evaluator, config.threads),
    }
}
