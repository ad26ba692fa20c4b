// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Spreads the work of coloring the pixel grid over a fixed pool of
//! threads.
//!
//! The grid is cut into whole rows or whole columns.  Those units go
//! into a queue behind a mutex, and each worker pulls the next unit
//! off the queue until it is empty, so the number of threads stays at
//! whatever the caller asked for no matter how big the image is.
//! Every unit owns a disjoint piece of the output; the render returns
//! only once every worker has finished, and if any worker panics the
//! whole image is thrown away.

use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use log::trace;
use num::Complex;
use std::ops::Range;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};

use crate::error::RenderError;
use crate::escape::EscapeEvaluator;
use crate::palette::Rgb;
use crate::pixels::{write_pixel, PixelBuffer, CHANNELS};
use crate::planes::{Pixel, PlaneMapper};

type RowQueue<'b> = Arc<Mutex<std::iter::Enumerate<ChunksMut<'b, u8>>>>;
type ColumnQueue = Arc<Mutex<Range<usize>>>;
type FinishedColumn = (usize, Vec<Rgb>);

/// Colors a single row, writing directly into that row's bytes.
fn render_row(mapper: &PlaneMapper, evaluator: &EscapeEvaluator, row: usize, pixels: &mut [u8]) {
    let im = mapper.row_to_im(row);
    for (column, slot) in pixels.chunks_mut(CHANNELS).enumerate() {
        let point = Complex::new(mapper.column_to_re(column), im);
        write_pixel(slot, &evaluator.color(point));
    }
}

/// Colors a single column, top to bottom.
fn render_column(mapper: &PlaneMapper, evaluator: &EscapeEvaluator, column: usize) -> Vec<Rgb> {
    let re = mapper.column_to_re(column);
    (0..mapper.height())
        .map(|row| evaluator.color(Complex::new(re, mapper.row_to_im(row))))
        .collect()
}

/// Never start more workers than there are units to hand out.
fn pool_size(threads: usize, units: usize) -> usize {
    threads.min(units).max(1)
}

/// Renders with one unit of work per row.  Each worker is handed the
/// row's own slice of the output buffer, so no two workers can ever
/// write the same bytes.
pub fn render_rows(
    mapper: &PlaneMapper,
    evaluator: &EscapeEvaluator,
    threads: usize,
) -> Result<PixelBuffer, RenderError> {
    let mut buffer = PixelBuffer::new(mapper.width(), mapper.height());
    let threads = pool_size(threads, mapper.height());
    {
        let rows: RowQueue = Arc::new(Mutex::new(buffer.rows_mut().enumerate()));
        crossbeam::scope(|spawner| {
            for worker in 0..threads {
                let rows = rows.clone();
                spawner.spawn(move |_| {
                    let mut count = 0;
                    loop {
                        let row = { rows.lock().unwrap().next() };
                        match row {
                            Some((row, pixels)) => {
                                render_row(mapper, evaluator, row, pixels);
                                count += 1;
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    trace!("row worker {} finished after {} rows", worker, count);
                });
            }
        })
        .map_err(|_| RenderError::WorkerFailed)?;
    }
    Ok(buffer)
}

/// Renders with one unit of work per column.  Workers hand their
/// finished columns back when they join, and the calling thread
/// copies them into place.
pub fn render_columns(
    mapper: &PlaneMapper,
    evaluator: &EscapeEvaluator,
    threads: usize,
) -> Result<PixelBuffer, RenderError> {
    let threads = pool_size(threads, mapper.width());
    let columns: ColumnQueue = Arc::new(Mutex::new(0..mapper.width()));

    let finished = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Vec<FinishedColumn>>> = (0..threads)
            .map(|worker| {
                let columns = columns.clone();
                spawner.spawn(move |_| {
                    let mut finished: Vec<FinishedColumn> = vec![];
                    loop {
                        let column = { columns.lock().unwrap().next() };
                        match column {
                            Some(column) => {
                                finished.push((column, render_column(mapper, evaluator, column)))
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    trace!("column worker {} finished after {} columns", worker, finished.len());
                    finished
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<Vec<FinishedColumn>>, _>>()
    })
    .map_err(|_| RenderError::WorkerFailed)?
    .map_err(|_| RenderError::WorkerFailed)?;

    let mut buffer = PixelBuffer::new(mapper.width(), mapper.height());
    for (column, colors) in finished.into_iter().flatten() {
        for (row, color) in colors.iter().enumerate() {
            buffer.put(column, row, color);
        }
    }
    Ok(buffer)
}

/// The single-threaded reference render: every pixel, in raster
/// order, on the calling thread.
pub fn render_single(mapper: &PlaneMapper, evaluator: &EscapeEvaluator) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(mapper.width(), mapper.height());
    for (row, column) in iproduct!(0..mapper.height(), 0..mapper.width()) {
        let point = mapper.pixel_to_point(&Pixel(column, row));
        buffer.put(column, row, &evaluator.color(point));
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::planes::Viewport;

    fn setup(width: u32, height: u32, zoom: f64) -> (PlaneMapper, Palette) {
        let viewport = Viewport::new(width, height, Complex::new(-0.5, 0.0), zoom).unwrap();
        let palette =
            Palette::new(&["#000764", "#206bcb", "#edffff", "#ffaa00", "#000200", "#000000"], 8)
                .unwrap();
        (PlaneMapper::new(&viewport), palette)
    }

    #[test]
    fn rows_match_single_threaded() {
        let (mapper, palette) = setup(61, 37, 1.0);
        let evaluator = EscapeEvaluator::new(&palette, 256);
        let single = render_single(&mapper, &evaluator);
        for threads in &[1, 3, 8, 100] {
            assert_eq!(render_rows(&mapper, &evaluator, *threads).unwrap(), single);
        }
    }

    #[test]
    fn columns_match_rows() {
        let (mapper, palette) = setup(53, 41, 2.5);
        let evaluator = EscapeEvaluator::new(&palette, 512);
        let rows = render_rows(&mapper, &evaluator, 4).unwrap();
        let columns = render_columns(&mapper, &evaluator, 4).unwrap();
        assert_eq!(rows.as_bytes(), columns.as_bytes());
    }

    #[test]
    fn every_pixel_is_opaque() {
        let (mapper, palette) = setup(40, 30, 1.0);
        let evaluator = EscapeEvaluator::new(&palette, 128);
        for buffer in vec![
            render_rows(&mapper, &evaluator, 3).unwrap(),
            render_columns(&mapper, &evaluator, 3).unwrap(),
        ] {
            assert_eq!(buffer.len(), 40 * 30 * 4);
            assert!(buffer.as_bytes().chunks(4).all(|p| p[3] == 255));
        }
    }

    #[test]
    fn single_pixel_image() {
        let (mapper, palette) = setup(1, 1, 1.0);
        let evaluator = EscapeEvaluator::new(&palette, 64);
        let buffer = render_columns(&mapper, &evaluator, 16).unwrap();
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer, render_rows(&mapper, &evaluator, 16).unwrap());
    }

    #[test]
    fn pool_never_exceeds_units() {
        assert_eq!(pool_size(8, 3), 3);
        assert_eq!(pool_size(2, 300), 2);
        assert_eq!(pool_size(0, 300), 1);
    }
}
