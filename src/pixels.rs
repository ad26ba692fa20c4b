// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output image: row-major RGBA8888, four bytes per pixel, with
//! a stride of exactly `width * 4`.

use crate::palette::Rgb;

/// Bytes per pixel.
pub const CHANNELS: usize = 4;

/// Writes one opaque pixel into a four-byte slot.  Touches nothing
/// outside `slot`.
#[inline]
pub fn write_pixel(slot: &mut [u8], color: &Rgb) {
    slot[..CHANNELS].copy_from_slice(&color.to_rgba8());
}

/// An owned RGBA8888 image.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// A zeroed (transparent black) buffer of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            pixels: vec![0 as u8; width * height * CHANNELS],
            width,
            height,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Byte offset of the pixel at `column`, `row`.
    #[inline]
    pub fn offset(&self, column: usize, row: usize) -> usize {
        row * self.stride() + column * CHANNELS
    }

    /// Writes a color into the pixel at `column`, `row`.
    #[inline]
    pub fn put(&mut self, column: usize, row: usize, color: &Rgb) {
        let offset = self.offset(column, row);
        write_pixel(&mut self.pixels[offset..offset + CHANNELS], color);
    }

    /// The RGBA bytes of the pixel at `column`, `row`.
    pub fn pixel(&self, column: usize, row: usize) -> [u8; 4] {
        let offset = self.offset(column, row);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + CHANNELS]);
        rgba
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Splits the buffer into one mutable slice per row, top first.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<u8> {
        let stride = self.stride();
        self.pixels.chunks_mut(stride)
    }

    /// Gives up the raw bytes, for handing to an encoder.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}
