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

//! Background memory sampler.
//!
//! A [`Sampler`] reads a [`ResourceProbe`] on a fixed cadence from its own
//! thread while the caller performs the measured operation. Tick `k` is
//! scheduled at `start + k * interval` for `k >= 1`; there is no sample at
//! time zero.
//!
//! The sample vector is owned by the sampling thread and handed back when
//! [`Sampler::stop`] joins it, so no lock guards it. A tick that fired just
//! before the stop request may still be recorded, but samples whose
//! timestamp is not strictly earlier than the stop instant are dropped: a
//! 250 ms operation sampled every 100 ms keeps the ticks at 100 and 200.

use crate::core::measurement::MemorySample;
use crate::core::probe::{MemoryReading, ResourceProbe};
use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Default sampling period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Whether samples are recorded relative to the baseline or as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// Each sample is `reading - baseline`.
    Relative,
    /// Each sample is the raw reading.
    #[default]
    Absolute,
}

impl SampleMode {
    /// Returns the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleMode::Relative => "relative",
            SampleMode::Absolute => "absolute",
        }
    }

    /// Builds the sample recorded for `reading` at `timestamp_ms`.
    pub fn sample(
        &self,
        timestamp_ms: u64,
        reading: MemoryReading,
        baseline: MemoryReading,
    ) -> MemorySample {
        match self {
            SampleMode::Relative => MemorySample::delta(timestamp_ms, reading, baseline),
            SampleMode::Absolute => MemorySample::absolute(timestamp_ms, reading),
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relative" => Ok(SampleMode::Relative),
            "absolute" => Ok(SampleMode::Absolute),
            other => Err(BenchError::invalid_config(
                "sampleMode",
                format!("'{other}' is not one of relative, absolute"),
            )),
        }
    }
}

/// Sampler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Period between ticks.
    pub interval: Duration,
    /// How readings are turned into samples.
    pub mode: SampleMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            mode: SampleMode::Absolute,
        }
    }
}

/// Offsets of the ticks that land strictly before `elapsed`.
///
/// This is the boundary rule the sampler applies: with a 100 ms interval a
/// 250 ms run yields `[100, 200]`, and a 300 ms run also yields `[100, 200]`
/// because the tick at exactly 300 ms is not strictly earlier than the stop.
pub fn tick_offsets(interval: Duration, elapsed: Duration) -> Vec<Duration> {
    if interval.is_zero() {
        return Vec::new();
    }
    (1u32..)
        .map_while(|k| interval.checked_mul(k))
        .take_while(|offset| *offset < elapsed)
        .collect()
}

struct Running {
    started: Instant,
    stop_tx: Sender<()>,
    handle: JoinHandle<Vec<MemorySample>>,
}

/// Fixed-cadence memory sampler with an explicit start/stop lifecycle.
pub struct Sampler {
    config: SamplerConfig,
    running: Option<Running>,
}

impl Sampler {
    /// Creates an idle sampler.
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    /// Returns the sampler settings.
    pub fn config(&self) -> SamplerConfig {
        self.config
    }

    /// Returns whether a sampling thread is active.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts sampling `probe` against `baseline`.
    ///
    /// Starting an already running sampler first stops the previous run and
    /// discards its samples.
    pub fn start(
        &mut self,
        probe: Arc<dyn ResourceProbe>,
        baseline: MemoryReading,
    ) -> crate::Result<()> {
        if self.running.is_some() {
            warn!("sampler restarted while running, previous samples discarded");
            drop(self.stop());
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let config = self.config;
        let started = Instant::now();

        let handle = thread::Builder::new()
            .name("memory-sampler".to_string())
            .spawn(move || {
                let mut samples = Vec::new();
                let mut tick: u32 = 1;
                loop {
                    let Some(due) = config.interval.checked_mul(tick) else {
                        break;
                    };
                    let wait = due.saturating_sub(started.elapsed());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            let reading = probe.read();
                            let elapsed = started.elapsed();
                            samples.push(config.mode.sample(
                                duration_ms(elapsed),
                                reading,
                                baseline,
                            ));
                            // Skip ticks missed while the probe was running.
                            tick = next_tick(config.interval, elapsed);
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                samples
            })
            .map_err(|e| crate::BenchError::Sampler(format!("failed to spawn thread: {e}")))?;

        self.running = Some(Running {
            started,
            stop_tx,
            handle,
        });
        Ok(())
    }

    /// Stops sampling and returns the samples in timestamp order.
    ///
    /// Returns an empty vector when the sampler is not running, so repeated
    /// calls and calls without [`Sampler::start`] are harmless.
    pub fn stop(&mut self) -> Vec<MemorySample> {
        let Some(running) = self.running.take() else {
            return Vec::new();
        };
        let stopped_at = duration_ms(running.started.elapsed());

        // A send error means the thread already exited; joining still works.
        let _ = running.stop_tx.send(());
        match running.handle.join() {
            Ok(mut samples) => {
                samples.retain(|sample| sample.timestamp < stopped_at);
                trace!(count = samples.len(), stopped_at, "sampler stopped");
                samples
            }
            Err(_) => {
                warn!("sampler thread panicked, samples for this run are lost");
                Vec::new()
            }
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn next_tick(interval: Duration, elapsed: Duration) -> u32 {
    let interval_ns = interval.as_nanos().max(1);
    let passed = elapsed.as_nanos() / interval_ns;
    u32::try_from(passed).unwrap_or(u32::MAX).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Probe whose heap counter increases by one on every read.
    struct CountingProbe {
        reads: AtomicU64,
    }

    impl ResourceProbe for CountingProbe {
        fn read(&self) -> MemoryReading {
            let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
            MemoryReading {
                heap_used: 10 + n,
                heap_total: 20,
                external: 1,
                rss: 50,
            }
        }
    }

    fn counting_probe() -> Arc<CountingProbe> {
        Arc::new(CountingProbe {
            reads: AtomicU64::new(0),
        })
    }

    fn baseline() -> MemoryReading {
        MemoryReading {
            heap_used: 10,
            heap_total: 20,
            external: 1,
            rss: 50,
        }
    }

    #[test]
    fn test_sample_mode_parsing() {
        assert_eq!("absolute".parse::<SampleMode>().unwrap(), SampleMode::Absolute);
        assert_eq!(SampleMode::default().to_string(), "absolute");
        assert!("peak".parse::<SampleMode>().unwrap_err().is_configuration());
    }

    #[test]
    fn test_tick_offsets_boundary() {
        let ms = Duration::from_millis;
        assert_eq!(tick_offsets(ms(100), ms(250)), vec![ms(100), ms(200)]);
        assert_eq!(tick_offsets(ms(100), ms(300)), vec![ms(100), ms(200)]);
        assert_eq!(
            tick_offsets(ms(100), ms(301)),
            vec![ms(100), ms(200), ms(300)]
        );
        assert!(tick_offsets(ms(100), ms(99)).is_empty());
        assert!(tick_offsets(Duration::ZERO, ms(500)).is_empty());
    }

    #[test]
    fn test_next_tick_skips_missed_ticks() {
        let ms = Duration::from_millis;
        assert_eq!(next_tick(ms(100), ms(100)), 2);
        assert_eq!(next_tick(ms(100), ms(105)), 2);
        assert_eq!(next_tick(ms(100), ms(350)), 4);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut sampler = Sampler::new(SamplerConfig::default());
        assert!(!sampler.is_running());
        assert!(sampler.stop().is_empty());
    }

    #[test]
    fn test_stop_twice_is_noop() {
        let mut sampler = Sampler::new(SamplerConfig {
            interval: Duration::from_millis(5),
            mode: SampleMode::Relative,
        });
        sampler.start(counting_probe(), baseline()).unwrap();
        thread::sleep(Duration::from_millis(30));
        let first = sampler.stop();
        assert!(!first.is_empty());
        assert!(sampler.stop().is_empty());
    }

    #[test]
    fn test_relative_samples_are_ordered_deltas() {
        let mut sampler = Sampler::new(SamplerConfig {
            interval: Duration::from_millis(5),
            mode: SampleMode::Relative,
        });
        sampler.start(counting_probe(), baseline()).unwrap();
        thread::sleep(Duration::from_millis(40));
        let samples = sampler.stop();

        assert!(!samples.is_empty());
        assert!(samples
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.heap_used, i as i64 + 1);
            assert_eq!(sample.heap_total, 0);
            assert_eq!(sample.rss, 0);
        }
    }

    #[test]
    fn test_absolute_samples_keep_readings() {
        let mut sampler = Sampler::new(SamplerConfig {
            interval: Duration::from_millis(5),
            mode: SampleMode::Absolute,
        });
        sampler.start(counting_probe(), baseline()).unwrap();
        thread::sleep(Duration::from_millis(20));
        let samples = sampler.stop();

        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s.rss == 50 && s.heap_total == 20));
    }

    #[test]
    fn test_no_samples_after_stop() {
        let probe = counting_probe();
        let mut sampler = Sampler::new(SamplerConfig {
            interval: Duration::from_millis(5),
            mode: SampleMode::Relative,
        });
        sampler.start(probe.clone(), baseline()).unwrap();
        thread::sleep(Duration::from_millis(20));
        sampler.stop();

        let reads = probe.reads.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(probe.reads.load(Ordering::SeqCst), reads);
    }

    #[test]
    fn test_quick_operation_yields_no_samples() {
        let mut sampler = Sampler::new(SamplerConfig {
            interval: Duration::from_secs(10),
            mode: SampleMode::Relative,
        });
        sampler.start(counting_probe(), baseline()).unwrap();
        assert!(sampler.stop().is_empty());
    }

    #[test]
    fn test_drop_stops_thread() {
        let probe = counting_probe();
        {
            let mut sampler = Sampler::new(SamplerConfig {
                interval: Duration::from_millis(5),
                mode: SampleMode::Relative,
            });
            sampler.start(probe.clone(), baseline()).unwrap();
            thread::sleep(Duration::from_millis(15));
        }
        let reads = probe.reads.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(probe.reads.load(Ordering::SeqCst), reads);
    }
}
