// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport, which describes what part of the complex
//! plane the caller wants to look at, and the PlaneMapper, which
//! describes a relationship between a rectangle on the integral plane
//! with an origin at 0,0 and the rectangle on the complex plane that
//! the viewport selects.

use num::Complex;

use crate::error::RenderError;
use crate::pixels::CHANNELS;

/// Width of the complex-plane window at a zoom of 1.
pub const DEFAULT_SPAN_RE: f64 = 3.0;

/// Height of the complex-plane window at a zoom of 1.
pub const DEFAULT_SPAN_IM: f64 = 2.0;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// The column and row of a pixel, in that order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// What the caller asked to see: a center point, a magnification, and
/// the size of the image in pixels.  Validated on construction and
/// immutable afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    center: Complex<f64>,
    zoom: f64,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Constructor.  Fails if either dimension is zero, if the image
    /// would not fit in memory, if the zoom is not a positive finite
    /// number, or if the window it selects has no finite extent.
    pub fn new(
        width: u32,
        height: u32,
        center: Complex<f64>,
        zoom: f64,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport(format!(
                "image size {}x{} has no pixels",
                width, height
            )));
        }

        if (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .is_none()
        {
            return Err(RenderError::InvalidViewport(format!(
                "image size {}x{} is too large to address",
                width, height
            )));
        }

        if !(zoom > 0.0) || !zoom.is_finite() {
            return Err(RenderError::InvalidViewport(format!(
                "zoom must be a positive number, got {}",
                zoom
            )));
        }

        if !center.re.is_finite() || !center.im.is_finite() {
            return Err(RenderError::InvalidViewport(format!(
                "center {} is not a finite point",
                center
            )));
        }

        let viewport = Viewport {
            center,
            zoom,
            width,
            height,
        };
        let (span, min) = (viewport.span(), viewport.min());
        if !(span.re.is_finite() && span.im.is_finite() && min.re.is_finite() && min.im.is_finite()) {
            return Err(RenderError::InvalidViewport(format!(
                "zoom {} around {} gives an infinite window",
                zoom, center
            )));
        }
        Ok(viewport)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The point at the middle of the image.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// The magnification factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The size of the window on the complex plane; the real part is
    /// the width and the imaginary part the height.
    pub fn span(&self) -> Complex<f64> {
        Complex::new(DEFAULT_SPAN_RE / self.zoom, DEFAULT_SPAN_IM / self.zoom)
    }

    /// The corner of the window with the smallest real and imaginary
    /// parts.  Pixel 0,0 maps here.
    pub fn min(&self) -> Complex<f64> {
        let span = self.span();
        Complex::new(
            self.center.re - span.re / 2.0,
            self.center.im - span.im / 2.0,
        )
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane, and the window on the complex plane picked out by a
/// Viewport.  Maps pixels on the one to points on the other.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The right-lower hand corner of the integral cartesian plane.
    /// The left-upper is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    // The complex point that pixel 0,0 maps to.
    origin: Complex<f64>,
    // Width (re) and height (im) of the window on the complex plane.
    span: Complex<f64>,
}

impl PlaneMapper {
    /// Derives the extents of the complex window from the viewport.
    pub fn new(viewport: &Viewport) -> PlaneMapper {
        PlaneMapper {
            integral_plane: IntegralPlane(viewport.width() as usize, viewport.height() as usize),
            origin: viewport.min(),
            span: viewport.span(),
        }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The complex point that pixel 0,0 maps to.
    pub fn origin(&self) -> Complex<f64> {
        self.origin
    }

    /// Width (real part) and height (imaginary part) of the window.
    pub fn span(&self) -> Complex<f64> {
        self.span
    }

    /// The real coordinate of every pixel in a given column.
    #[inline]
    pub fn column_to_re(&self, column: usize) -> f64 {
        (column as f64 / self.integral_plane.0 as f64) * self.span.re + self.origin.re
    }

    /// The imaginary coordinate of every pixel in a given row.
    #[inline]
    pub fn row_to_im(&self, row: usize) -> f64 {
        (row as f64 / self.integral_plane.1 as f64) * self.span.im + self.origin.im
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number at the equivalent location of the window.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(self.column_to_re(pixel.0), self.row_to_im(pixel.1))
    }
}
