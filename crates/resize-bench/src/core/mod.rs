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
//! Core benchmark infrastructure.
//!
//! Provides configuration, the memory probe and sampler, measurement records
//! and result persistence.
//!
//! # Modules
//!
//! - `config`: Centralized benchmark configuration
//! - `probe`: Process memory readings
//! - `sampler`: Fixed-cadence background memory sampling
//! - `measurement`: Samples, per-iteration and per-run results
//! - `store`: Timestamped result and comparison files

pub mod config;
pub mod measurement;
pub mod probe;
pub mod sampler;
pub mod store;

// Re-export commonly used types
pub use config::{BenchConfig, FitMode};
pub use measurement::{
    IterationFailure, MemorySample, MemorySampleStats, MemoryStats, ProcessResult, TestResult,
};
pub use probe::{bytes_to_mb, MemoryReading, ResourceProbe, SystemProbe};
pub use sampler::{tick_offsets, SampleMode, Sampler, SamplerConfig};
pub use store::{file_timestamp, ResultStore};
