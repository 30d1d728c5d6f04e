//! Host/device transfer and kernel tracing, enabled with the `memtrace`
//! feature.

mod copytoken;

pub use copytoken::{CopyToken, start};

use once_cell::sync::Lazy;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Instant,
};

/// What a traced span did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    H2D,
    D2H,
    Kernel,
}

impl Dir {
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::H2D => "H2D",
            Dir::D2H => "D2H",
            Dir::Kernel => "Kernel",
        }
    }
}

/// Reference point of all timestamps.
pub static T0: Lazy<Instant> = Lazy::new(Instant::now);

static AUTO_TRACE: AtomicBool = AtomicBool::new(true);

/// End of the most recent span, to derive idle gaps.
static LAST_END_US: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn is_auto_trace_enabled() -> bool {
    AUTO_TRACE.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub t_start_us: u64,
    pub t_end_us: u64,
    pub bytes: usize,
    pub dir: Dir,
    /// Time since the previous span ended, 0 if they overlap.
    pub idle_us: u64,
}

pub static LOG: Lazy<Mutex<Vec<Record>>> = Lazy::new(|| Mutex::new(Vec::with_capacity(256)));

pub(crate) fn push(dir: Dir, bytes: usize, t_start_us: u64, t_end_us: u64) {
    let prev_end = LAST_END_US.fetch_max(t_end_us, Ordering::Relaxed);
    let idle_us = t_start_us.saturating_sub(prev_end);
    LOG.lock().unwrap_or_else(|e| e.into_inner()).push(Record {
        t_start_us,
        t_end_us,
        bytes,
        dir,
        idle_us,
    });
}

/// Copy of the current log.
pub fn snapshot() -> Vec<Record> {
    LOG.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

pub fn reset() {
    LOG.lock().unwrap_or_else(|e| e.into_inner()).clear();
    LAST_END_US.store(0, Ordering::Relaxed);
}

/// Writes `memtrace.csv` and `memtrace_summary.txt` into `dir`.
pub fn flush_csv(dir: &Path) -> io::Result<()> {
    let log = snapshot();

    let mut f = BufWriter::new(File::create(dir.join("memtrace.csv"))?);
    writeln!(f, "t_start_us,t_end_us,bytes,dir,idle_us")?;
    for r in &log {
        writeln!(
            f,
            "{},{},{},{},{}",
            r.t_start_us,
            r.t_end_us,
            r.bytes,
            r.dir.as_str(),
            r.idle_us
        )?;
    }
    f.flush()?;

    let bytes_in = |d: Dir| -> u64 {
        log.iter()
            .filter(|r| r.dir == d)
            .map(|r| r.bytes as u64)
            .sum()
    };
    let mut s = File::create(dir.join("memtrace_summary.txt"))?;
    writeln!(s, "events_total: {}", log.len())?;
    writeln!(s, "idle_total_us: {}", log.iter().map(|r| r.idle_us).sum::<u64>())?;
    writeln!(s, "bytes_h2d: {}", bytes_in(Dir::H2D))?;
    writeln!(s, "bytes_d2h: {}", bytes_in(Dir::D2H))?;
    writeln!(s, "kernels: {}", log.iter().filter(|r| r.dir == Dir::Kernel).count())?;
    Ok(())
}

/// Restores the previous auto-trace state on drop.
#[derive(Debug)]
pub struct TracingScope {
    prev: bool,
}

impl TracingScope {
    #[inline]
    pub fn new(enable: bool) -> Self {
        let prev = AUTO_TRACE.swap(enable, Ordering::Relaxed);
        TracingScope { prev }
    }

    #[inline]
    pub fn disabled() -> Self {
        Self::new(false)
    }
}

impl Drop for TracingScope {
    fn drop(&mut self) {
        AUTO_TRACE.store(self.prev, Ordering::Relaxed);
    }
}

#[inline]
pub fn now_us() -> u64 {
    Instant::now().duration_since(*T0).as_micros() as u64
}
