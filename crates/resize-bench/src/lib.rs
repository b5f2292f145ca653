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
//! Resize strategy benchmark harness.
//!
//! Compares alternative ways of resizing an image by running each one many
//! times while a background sampler records process memory.
//!
//! ## Pipeline
//!
//! - **Probe**: reads heap, external and resident memory in megabytes
//! - **Sampler**: reads the probe on a fixed cadence during one iteration
//! - **Executor**: times one strategy invocation and drives the sampler
//! - **Runner**: repeats the executor and reduces the iterations
//! - **Comparator**: picks the lowest-footprint strategy as baseline and
//!   computes relative deltas
//!
//! ## Usage
//!
//! ```bash
//! resize-bench buffer --iterations 20
//! resize-bench path --iterations 20
//! resize-compare
//! ```

pub mod core;
pub mod error;
pub mod harness;
pub mod reporters;
pub mod strategies;

pub use crate::core::{BenchConfig, ResultStore, TestResult};
pub use error::{BenchError, Result};
pub use strategies::{ResizeOptions, Strategy, StrategyKind, WorkInput};
