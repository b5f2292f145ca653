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
//! Direct path strategy.

use super::{output_format, resize_image, save, ResizeOptions, Strategy, StrategyKind, WorkInput};
use crate::error::{BenchError, Result};
use image::ImageFormat;
use tracing::trace;

/// Lets the decoder open the input path and writes the result to
/// [`WorkInput::output_path`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathStrategy;

impl Strategy for PathStrategy {
    fn name(&self) -> &str {
        StrategyKind::Path.as_str()
    }

    fn execute(&self, input: &WorkInput, options: &ResizeOptions) -> Result<()> {
        let output = input
            .output_path
            .as_deref()
            .ok_or_else(|| BenchError::work_unit(self.name(), "no output path configured"))?;

        let decoded =
            image::open(&input.input_path).map_err(|e| BenchError::work_unit(self.name(), e))?;
        let resized = resize_image(decoded, options);
        let format = output_format(ImageFormat::from_path(&input.input_path).ok());
        save(&resized, output, format).map_err(|e| BenchError::work_unit(self.name(), e))?;

        trace!(output = %output.display(), "path resize done");
        Ok(())
    }
}
