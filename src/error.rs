// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a render.  All of these except
//! `WorkerFailed` are detected before a single worker is started, so
//! a failed render never leaves a half-painted buffer behind.

/// The single error type returned by the renderer.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum RenderError {
    /// The zoom factor was zero, negative, or not a number, or one of
    /// the image dimensions was zero.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// A control color was not of the form `#RRGGBB` (or `#RGB`).
    #[fail(display = "invalid color {:?}: expected #RRGGBB", _0)]
    InvalidColor(String),

    /// The palette would have no entries: too few control colors, or a
    /// spacing of zero.
    #[fail(display = "degenerate palette: {}", _0)]
    DegeneratePalette(String),

    /// The render configuration is unusable (no iterations, no threads).
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// A worker thread panicked while rendering.  The partially
    /// written buffer has been discarded.
    #[fail(display = "render worker failed")]
    WorkerFailed,
}
