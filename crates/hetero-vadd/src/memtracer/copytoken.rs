use super::{Dir, is_auto_trace_enabled, now_us, push};

/// Open span; recorded when finished. Spans started while auto-tracing is
/// off are dropped.
#[derive(Debug)]
#[must_use = "a span is only recorded by `finish`"]
pub struct CopyToken {
    dir: Dir,
    bytes: usize,
    t_start_us: u64,
    active: bool,
}

pub fn start(dir: Dir, bytes: usize) -> CopyToken {
    CopyToken {
        dir,
        bytes,
        t_start_us: now_us(),
        active: is_auto_trace_enabled(),
    }
}

impl CopyToken {
    pub fn finish(self) {
        if self.active {
            push(self.dir, self.bytes, self.t_start_us, now_us());
        }
    }
}
