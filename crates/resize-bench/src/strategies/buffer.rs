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

//! Whole-file buffer strategy.

use super::{encode, output_format, resize_image, ResizeOptions, Strategy, StrategyKind, WorkInput};
use crate::error::{BenchError, Result};
use std::fs;
use tracing::trace;

/// Reads the entire input into memory before decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferStrategy;

impl Strategy for BufferStrategy {
    fn name(&self) -> &str {
        StrategyKind::Buffer.as_str()
    }

    fn execute(&self, input: &WorkInput, options: &ResizeOptions) -> Result<()> {
        let bytes =
            fs::read(&input.input_path).map_err(|e| BenchError::work_unit(self.name(), e))?;
        let format = image::guess_format(&bytes).ok();
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| BenchError::work_unit(self.name(), e))?;
        let resized = resize_image(decoded, options);
        let encoded = encode(&resized, output_format(format))
            .map_err(|e| BenchError::work_unit(self.name(), e))?;

        trace!(input = bytes.len(), output = encoded.len(), "buffer resize done");
        Ok(())
    }
}
