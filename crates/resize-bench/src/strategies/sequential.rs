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
//! Sequential read strategy.

use super::{encode, output_format, resize_image, ResizeOptions, Strategy, StrategyKind, WorkInput};
use crate::error::{BenchError, Result};
use image::io::Reader as ImageReader;
use std::fs::File;
use std::io::BufReader;
use tracing::trace;

/// Read buffer size of the sequential strategy.
///
/// Half the `BufReader` default that the `stream` strategy uses, so the
/// decoder pulls the file through many more, smaller reads.
pub const SEQUENTIAL_READ_CAPACITY: usize = 4 * 1024;

/// Opens the input path and decodes it front to back through a small,
/// fixed-size read buffer.
#[derive(Debug, Clone, Copy)]
pub struct SequentialStreamStrategy {
    capacity: usize,
}

impl SequentialStreamStrategy {
    /// Creates the strategy with a custom read buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}

impl Default for SequentialStreamStrategy {
    fn default() -> Self {
        Self::with_capacity(SEQUENTIAL_READ_CAPACITY)
    }
}

impl Strategy for SequentialStreamStrategy {
    fn name(&self) -> &str {
        StrategyKind::SequentialStream.as_str()
    }

    fn execute(&self, input: &WorkInput, options: &ResizeOptions) -> Result<()> {
        let file =
            File::open(&input.input_path).map_err(|e| BenchError::work_unit(self.name(), e))?;
        let reader = ImageReader::new(BufReader::with_capacity(self.capacity, file))
            .with_guessed_format()
            .map_err(|e| BenchError::work_unit(self.name(), e))?;
        let format = reader.format();
        let decoded = reader
            .decode()
            .map_err(|e| BenchError::work_unit(self.name(), e))?;
        let resized = resize_image(decoded, options);
        let encoded = encode(&resized, output_format(format))
            .map_err(|e| BenchError::work_unit(self.name(), e))?;

        trace!(
            capacity = self.capacity,
            output = encoded.len(),
            "sequential resize done"
        );
        Ok(())
    }
}
