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

//! Resize and encode steps shared by all strategies.

use super::ResizeOptions;
use crate::core::config::FitMode;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat, ImageResult};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// JPEG quality used when re-encoding.
pub const JPEG_QUALITY: u8 = 80;

const FILTER: FilterType = FilterType::Lanczos3;

/// Computes the target box for a source image.
///
/// Without an explicit height the box follows the source aspect ratio.
pub fn target_dimensions(source: (u32, u32), options: &ResizeOptions) -> (u32, u32) {
    let (src_w, src_h) = source;
    let height = options.height.unwrap_or_else(|| {
        if src_w == 0 {
            return 1;
        }
        let scaled = (u64::from(src_h) * u64::from(options.width) + u64::from(src_w) / 2)
            / u64::from(src_w);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    });
    (options.width.max(1), height.max(1))
}

/// Resizes `image` into the target box according to the fit mode.
///
/// Without enlargement, an image that already fits the box is returned
/// unchanged.
pub fn resize_image(image: DynamicImage, options: &ResizeOptions) -> DynamicImage {
    let source = image.dimensions();
    let (width, height) = target_dimensions(source, options);

    if !options.allow_enlargement && source.0 <= width && source.1 <= height {
        return image;
    }

    match options.fit {
        FitMode::Inside => image.resize(width, height, FILTER),
        FitMode::Cover => image.resize_to_fill(width, height, FILTER),
        FitMode::Fill => image.resize_exact(width, height, FILTER),
        FitMode::Contain => {
            let scaled = image.resize(width, height, FILTER);
            let mut canvas = DynamicImage::new_rgba8(width, height);
            let x = i64::from(width.saturating_sub(scaled.width()) / 2);
            let y = i64::from(height.saturating_sub(scaled.height()) / 2);
            imageops::overlay(&mut canvas, &scaled, x, y);
            canvas
        }
    }
}

/// Picks the encoding for the resized image from the decoded format.
///
/// Only JPEG and PNG are supported; anything else is re-encoded as JPEG.
pub fn output_format(input: Option<ImageFormat>) -> ImageFormat {
    match input {
        Some(ImageFormat::Png) => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    }
}

fn write_encoded<W: Write + Seek>(
    image: &DynamicImage,
    writer: &mut W,
    format: ImageFormat,
) -> ImageResult<()> {
    match format {
        ImageFormat::Png => image.write_to(writer, ImageOutputFormat::Png),
        _ => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_to(writer, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        }
    }
}

/// Encodes `image` into a new buffer.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    write_encoded(image, &mut buffer, format)?;
    Ok(buffer.into_inner())
}

/// Encodes `image` straight into a file, with the same settings as
/// [`encode`].
pub fn save(image: &DynamicImage, path: &Path, format: ImageFormat) -> ImageResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_encoded(image, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}
