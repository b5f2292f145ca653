// Dweve Resize Bench - Image resize strategy benchmarking
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Resize strategies under test.
//!
//! Every strategy performs the same work unit (decode, resize, encode) and
//! differs only in how the image bytes reach the decoder and where the
//! encoded result goes:
//!
//! | Strategy            | Input                         | Output           |
//! |---------------------|-------------------------------|------------------|
//! | `buffer`            | whole file read into memory   | in-memory buffer |
//! | `stream`            | buffered file reader          | in-memory buffer |
//! | `path`              | decoder opens the path itself | file on disk     |
//! | `sequential-stream` | small fixed-size read buffer  | in-memory buffer |

mod buffer;
mod path;
mod resize;
mod sequential;
mod stream;

pub use buffer::BufferStrategy;
pub use path::PathStrategy;
pub use resize::{encode, output_format, resize_image, save, target_dimensions};
pub use sequential::SequentialStreamStrategy;
pub use stream::StreamStrategy;

use crate::core::config::FitMode;
use crate::error::{BenchError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resize parameters shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels; `None` keeps the source aspect ratio.
    pub height: Option<u32>,
    pub fit: FitMode,
    /// Whether images already inside the target box may be upscaled.
    pub allow_enlargement: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: crate::core::config::DEFAULT_TARGET_WIDTH,
            height: None,
            fit: FitMode::Inside,
            allow_enlargement: false,
        }
    }
}

/// Files a work unit reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInput {
    pub input_path: PathBuf,
    /// Destination for strategies that write to disk.
    pub output_path: Option<PathBuf>,
}

impl WorkInput {
    /// Creates an input without an output path.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
        }
    }

    /// Sets the output path.
    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }
}

/// One way of performing the benchmarked work unit.
pub trait Strategy: Send + Sync {
    /// Stable name used in result files and reports.
    fn name(&self) -> &str;

    /// Runs the work unit to completion.
    fn execute(&self, input: &WorkInput, options: &ResizeOptions) -> Result<()>;

    /// Drops any state carried between iterations.
    fn clear_cache(&self) {}
}

/// The selectable strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    Buffer,
    Stream,
    Path,
    SequentialStream,
}

impl StrategyKind {
    /// All strategies, in the order they are listed to users.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Buffer,
        StrategyKind::Stream,
        StrategyKind::Path,
        StrategyKind::SequentialStream,
    ];

    /// Returns the selector name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Buffer => "buffer",
            StrategyKind::Stream => "stream",
            StrategyKind::Path => "path",
            StrategyKind::SequentialStream => "sequential-stream",
        }
    }

    /// Selector names of all strategies.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(StrategyKind::as_str).collect()
    }

    /// Returns whether the strategy writes its result to a file.
    pub fn writes_output(&self) -> bool {
        matches!(self, StrategyKind::Path)
    }

    /// Builds the strategy implementation.
    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Buffer => Box::new(BufferStrategy),
            StrategyKind::Stream => Box::new(StreamStrategy),
            StrategyKind::Path => Box::new(PathStrategy),
            StrategyKind::SequentialStream => Box::new(SequentialStreamStrategy::default()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BenchError::UnknownStrategy {
                name: s.to_string(),
                valid: StrategyKind::names().into_iter().map(String::from).collect(),
            })
    }
}
