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
//! Single-iteration executor.
//!
//! [`StrategyExecutor::execute`] times exactly one invocation of a strategy
//! while the [`Sampler`] records memory alongside it:
//!
//! 1. stabilize the allocator (optional, injected);
//! 2. read the baseline from the probe;
//! 3. start the sampler;
//! 4. run the work unit and time it;
//! 5. stop the sampler, whether the work unit succeeded or not.

use crate::core::measurement::ProcessResult;
use crate::core::probe::ResourceProbe;
use crate::core::sampler::{Sampler, SamplerConfig};
use crate::error::Result;
use crate::strategies::{ResizeOptions, Strategy, WorkInput};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Brings memory to a reproducible state before the baseline is read.
pub trait Stabilizer: Send + Sync {
    fn stabilize(&self);
}

/// Stabilizer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStabilizer;

impl Stabilizer for NoopStabilizer {
    fn stabilize(&self) {}
}

/// Returns dirty pages of every jemalloc arena to the operating system.
///
/// Only effective when jemalloc is the global allocator. A failed purge is
/// logged and otherwise ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorPurge;

impl Stabilizer for AllocatorPurge {
    fn stabilize(&self) {
        purge_arenas();
    }
}

#[cfg(not(target_env = "msvc"))]
fn purge_arenas() {
    // 4096 is MALLCTL_ARENAS_ALL.
    const PURGE_ALL: &[u8] = b"arena.4096.purge\0";

    // SAFETY: the name is NUL-terminated and the control takes no input or
    // output, so all pointers are null with zero length.
    let code = unsafe {
        tikv_jemalloc_sys::mallctl(
            PURGE_ALL.as_ptr().cast(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            0,
        )
    };
    if code != 0 {
        warn!(code, "allocator purge failed, baseline may include cached pages");
    }
}

#[cfg(target_env = "msvc")]
fn purge_arenas() {
    debug!("allocator purge unavailable on this target");
}

/// Runs one strategy once and collects timing and memory samples.
pub struct StrategyExecutor {
    strategy: Box<dyn Strategy>,
    probe: Arc<dyn ResourceProbe>,
    stabilizer: Box<dyn Stabilizer>,
    sampler_config: SamplerConfig,
}

impl StrategyExecutor {
    /// Creates an executor without stabilization.
    pub fn new(
        strategy: Box<dyn Strategy>,
        probe: Arc<dyn ResourceProbe>,
        sampler_config: SamplerConfig,
    ) -> Self {
        Self {
            strategy,
            probe,
            stabilizer: Box::new(NoopStabilizer),
            sampler_config,
        }
    }

    /// Sets the stabilizer called before each baseline reading.
    pub fn with_stabilizer(mut self, stabilizer: Box<dyn Stabilizer>) -> Self {
        self.stabilizer = stabilizer;
        self
    }

    /// Returns the wrapped strategy.
    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Returns the sampler settings used for every iteration.
    pub fn sampler_config(&self) -> SamplerConfig {
        self.sampler_config
    }

    /// Times one invocation of the strategy.
    ///
    /// # Errors
    ///
    /// Returns the work unit's error after the sampler has been stopped, or
    /// [`BenchError::Sampler`](crate::BenchError::Sampler) when the sampling
    /// thread cannot be started.
    pub fn execute(&self, input: &WorkInput, options: &ResizeOptions) -> Result<ProcessResult> {
        self.stabilizer.stabilize();
        let baseline = self.probe.read();

        let mut sampler = Sampler::new(self.sampler_config);
        sampler.start(Arc::clone(&self.probe), baseline)?;

        let start = Instant::now();
        let outcome = self.strategy.execute(input, options);
        let elapsed = start.elapsed();

        let samples = sampler.stop();
        outcome?;

        let time = elapsed.as_secs_f64() * 1000.0;
        debug!(
            strategy = self.strategy.name(),
            time_ms = time,
            samples = samples.len(),
            "iteration complete"
        );
        Ok(ProcessResult { time, samples })
    }
}
