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
//! JSON export for results and comparisons.

use crate::error::{BenchError, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes `value` to a new file at `path` as pretty-printed JSON.
///
/// An existing file is never overwritten; it is reported as an
/// [`BenchError::Io`] error.
pub fn export_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = to_json(value)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| BenchError::io_error(path, e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| BenchError::io_error(path, e))
}

/// Renders `value` as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::MemoryStats;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_export_json() {
        let stats = MemoryStats {
            min: 1.0,
            max: 3.0,
            avg: 2.0,
        };
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stats.json");

        export_json(&stats, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"avg\": 2.0"));
        assert!(content.contains('\n'));
    }

    #[test]
    fn test_export_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taken.json");
        fs::write(&path, "first").unwrap();

        let err = export_json(&[1, 2, 3], &path).unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_export_into_missing_dir_fails_with_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing/out.json");
        match export_json(&[1, 2, 3], &path) {
            Err(BenchError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
