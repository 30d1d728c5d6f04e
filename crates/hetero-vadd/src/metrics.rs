//! Latency and allocation counters, enabled with the `metrics` feature.

use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

struct Sample {
    name: &'static str,
    micros: u128,
    bytes: usize,
}

static SAMPLES: Lazy<Mutex<Vec<Sample>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub static ALLOCS: AtomicUsize = AtomicUsize::new(0);
pub static ALLOC_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Call right after the measured operation: `record("kernel", t0)`.
pub fn record(name: &'static str, start: Instant) {
    record_transfer(name, start, 0);
}

/// Like [`record`], also counting the bytes moved.
pub fn record_transfer(name: &'static str, start: Instant, bytes: usize) {
    let micros = start.elapsed().as_micros();
    SAMPLES
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(Sample { name, micros, bytes });
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpStats {
    pub count: usize,
    pub mean_us: u128,
    pub p95_us: u128,
    pub bytes: usize,
    pub total_us: u128,
}

impl OpStats {
    /// Bytes per microsecond scaled to GB/s; `None` when nothing moved.
    pub fn throughput_gbps(&self) -> Option<f64> {
        (self.bytes > 0 && self.total_us > 0)
            .then(|| self.bytes as f64 / self.total_us as f64 / 1e3)
    }
}

/// Drains the recorded samples into per-operation statistics.
pub fn take_stats() -> BTreeMap<&'static str, OpStats> {
    let samples: Vec<Sample> = std::mem::take(&mut *SAMPLES.lock().unwrap_or_else(|e| e.into_inner()));

    let mut grouped: BTreeMap<&'static str, (Vec<u128>, usize)> = BTreeMap::new();
    for s in samples {
        let entry = grouped.entry(s.name).or_default();
        entry.0.push(s.micros);
        entry.1 += s.bytes;
    }

    grouped
        .into_iter()
        .map(|(name, (mut v, bytes))| {
            v.sort_unstable();
            let total_us: u128 = v.iter().sum();
            let mean_us = total_us / v.len() as u128;
            let p95_us = v[((v.len() * 95) / 100).saturating_sub(1)];
            (
                name,
                OpStats {
                    count: v.len(),
                    mean_us,
                    p95_us,
                    bytes,
                    total_us,
                },
            )
        })
        .collect()
}

pub fn summary() {
    println!("── metrics summary ──");
    for (name, s) in take_stats() {
        println!(
            "{:<18} n={:<4} mean={:>5} µs   p95={:>5} µs",
            name, s.count, s.mean_us, s.p95_us
        );
        if let Some(gbps) = s.throughput_gbps() {
            println!("    ↳ throughput ≈ {:.2} GB/s", gbps);
        }
    }

    let allocs = ALLOCS.load(Ordering::Relaxed);
    let bytes = ALLOC_BYTES.load(Ordering::Relaxed);
    println!("device allocations: {}   ({} bytes)", allocs, bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stats_group_by_operation() {
        let t0 = Instant::now() - Duration::from_millis(2);
        record("unit_kernel", t0);
        record_transfer("unit_write", t0, 4096);
        record_transfer("unit_write", t0, 4096);

        let stats = take_stats();
        let write = &stats["unit_write"];
        assert_eq!(write.count, 2);
        assert_eq!(write.bytes, 8192);
        assert!(write.mean_us >= 2000);
        assert!(write.throughput_gbps().is_some());
        assert_eq!(stats["unit_kernel"].throughput_gbps(), None);
    }
}
