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

//! Process memory probe.
//!
//! A probe returns the current memory footprint of the process as four whole
//! megabyte counters. Any counter the host cannot report reads as zero; a
//! missing dimension never aborts a benchmark.
//!
//! The production probe combines allocator statistics (jemalloc) with the
//! resident set size reported by the operating system:
//!
//! | Dimension    | Source                                   |
//! |--------------|------------------------------------------|
//! | `heap_used`  | jemalloc `stats.allocated`               |
//! | `heap_total` | jemalloc `stats.active`                  |
//! | `external`   | process RSS minus jemalloc `stats.resident` |
//! | `rss`        | process RSS via `sysinfo`                |
//!
//! The allocator counters are only meaningful when jemalloc is the global
//! allocator, which the `resize-bench` binaries install.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;

/// Bytes per reported megabyte (MiB).
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Converts bytes to whole megabytes, rounding half up.
///
/// Integer arithmetic keeps the conversion deterministic: 1.5 MiB reads as 2,
/// 1.49 MiB reads as 1.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes.saturating_add(BYTES_PER_MB / 2) / BYTES_PER_MB
}

/// One reading of the process memory counters, in megabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryReading {
    /// Bytes currently allocated by the application.
    pub heap_used: u64,
    /// Heap capacity reserved by the allocator.
    pub heap_total: u64,
    /// Resident memory outside the managed heap.
    pub external: u64,
    /// Resident set size of the whole process.
    pub rss: u64,
}

impl MemoryReading {
    /// Builds a reading from raw byte counts.
    pub fn from_bytes(heap_used: u64, heap_total: u64, external: u64, rss: u64) -> Self {
        Self {
            heap_used: bytes_to_mb(heap_used),
            heap_total: bytes_to_mb(heap_total),
            external: bytes_to_mb(external),
            rss: bytes_to_mb(rss),
        }
    }
}

/// Source of memory readings.
///
/// Implementations must be cheap enough to call every few tens of
/// milliseconds and must not fail: unavailable counters read as zero.
pub trait ResourceProbe: Send + Sync {
    /// Reads the current memory counters.
    fn read(&self) -> MemoryReading;
}

/// Allocator counters in bytes.
#[derive(Debug, Clone, Copy, Default)]
struct AllocatorStats {
    allocated: u64,
    active: u64,
    resident: u64,
}

/// Probe reading jemalloc statistics and the process RSS.
pub struct SystemProbe {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl SystemProbe {
    /// Creates a probe for the current process.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(reason) => {
                debug!(reason, "current pid unavailable, rss will read as 0");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }

    fn rss_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        let Ok(mut system) = self.system.lock() else {
            debug!("process table lock poisoned, rss reads as 0");
            return 0;
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        match system.process(pid) {
            Some(process) => process.memory(),
            None => {
                debug!(%pid, "process missing from refresh, rss reads as 0");
                0
            }
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProbe for SystemProbe {
    fn read(&self) -> MemoryReading {
        let allocator = allocator_stats();
        let rss = self.rss_bytes();
        let external = rss.saturating_sub(allocator.resident);
        MemoryReading::from_bytes(allocator.allocated, allocator.active, external, rss)
    }
}

#[cfg(not(target_env = "msvc"))]
fn allocator_stats() -> AllocatorStats {
    use tikv_jemalloc_ctl::{epoch, stats};

    // Statistics are cached by jemalloc until the epoch advances.
    if let Err(err) = epoch::advance() {
        debug!(%err, "jemalloc epoch advance failed, heap counters read as 0");
        return AllocatorStats::default();
    }

    let read = |name: &'static str, value: tikv_jemalloc_ctl::Result<usize>| match value {
        Ok(bytes) => bytes as u64,
        Err(err) => {
            debug!(counter = name, %err, "jemalloc counter unavailable, reads as 0");
            0
        }
    };

    AllocatorStats {
        allocated: read("stats.allocated", stats::allocated::read()),
        active: read("stats.active", stats::active::read()),
        resident: read("stats.resident", stats::resident::read()),
    }
}

#[cfg(target_env = "msvc")]
fn allocator_stats() -> AllocatorStats {
    AllocatorStats::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_mb_rounds_half_up() {
        assert_eq!(bytes_to_mb(0), 0);
        assert_eq!(bytes_to_mb(BYTES_PER_MB / 2 - 1), 0);
        assert_eq!(bytes_to_mb(BYTES_PER_MB / 2), 1);
        assert_eq!(bytes_to_mb(BYTES_PER_MB), 1);
        assert_eq!(bytes_to_mb(BYTES_PER_MB * 3 / 2), 2);
        assert_eq!(bytes_to_mb(BYTES_PER_MB * 5 / 2 - 1), 2);
        assert_eq!(bytes_to_mb(u64::MAX), u64::MAX / BYTES_PER_MB);
    }

    #[test]
    fn test_reading_from_bytes() {
        let reading = MemoryReading::from_bytes(
            10 * BYTES_PER_MB,
            16 * BYTES_PER_MB,
            BYTES_PER_MB / 4,
            64 * BYTES_PER_MB,
        );
        assert_eq!(
            reading,
            MemoryReading {
                heap_used: 10,
                heap_total: 16,
                external: 0,
                rss: 64,
            }
        );
    }

    #[test]
    fn test_system_reading_without_panicking() {
        let probe = SystemProbe::new();
        let first = probe.read();
        let second = probe.read();
        // RSS is the only counter every supported host reports.
        #[cfg(target_os = "linux")]
        assert!(first.rss > 0 || second.rss > 0);
        assert!(first.heap_used <= first.heap_total || first.heap_total == 0);
    }
}
