// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Knobs that change how (and how carefully) an image is rendered,
//! but never what the viewport or palette is.

use std::str::FromStr;

use crate::error::RenderError;

/// The iteration cap used when none is given.  Points that have not
/// escaped after this many steps are treated as interior points.
pub const DEFAULT_MAX_ITERATIONS: usize = 4096;

/// How the pixel grid is cut into independent units of work.  Both
/// strategies produce byte-identical images.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decomposition {
    /// One unit per image row.
    Rows,
    /// One unit per image column.
    Columns,
}

impl Default for Decomposition {
    fn default() -> Self {
        Decomposition::Rows
    }
}

impl FromStr for Decomposition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows" | "row" => Ok(Decomposition::Rows),
            "columns" | "column" | "cols" => Ok(Decomposition::Columns),
            _ => Err(format!("Unknown decomposition {:?}: use rows or columns", s)),
        }
    }
}

/// Render configuration.  Cheap to copy; construct with `default()`
/// and adjust with the `with_*` setters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Maximum number of iterations per point.
    pub max_iterations: usize,
    /// Size of the worker pool.  Units of work are pulled from a
    /// shared queue, so this is an upper bound on concurrency no
    /// matter how large the image is.
    pub threads: usize,
    /// Whether workers take rows or columns.
    pub decomposition: Decomposition,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            threads: num_cpus::get(),
            decomposition: Decomposition::default(),
        }
    }
}

impl RenderConfig {
    /// Replace the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replace the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Replace the decomposition strategy.
    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Self {
        self.decomposition = decomposition;
        self
    }

    /// Rejects configurations that cannot render anything.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidConfig(
                "the iteration cap must be at least 1".to_string(),
            ));
        }
        if self.threads == 0 {
            return Err(RenderError::InvalidConfig(
                "at least one worker thread is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(config.threads >= 1);
        assert_eq!(config.decomposition, Decomposition::Rows);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_iterations_rejected() {
        let config = RenderConfig::default().with_max_iterations(0);
        match config.validate() {
            Err(RenderError::InvalidConfig(_)) => (),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn zero_threads_rejected() {
        let config = RenderConfig::default().with_threads(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn decomposition_parses() {
        assert_eq!("rows".parse::<Decomposition>(), Ok(Decomposition::Rows));
        assert_eq!("columns".parse::<Decomposition>(), Ok(Decomposition::Columns));
        assert!("diagonals".parse::<Decomposition>().is_err());
    }
}
