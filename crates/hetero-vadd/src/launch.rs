//! Blocking kernel launches.

use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::program::Program;
use opencl3::types::{cl_int, cl_mem};
use tracing::debug;

use crate::buffer::{Allocated, DeviceBuffer, ReadOnly, WriteOnly};
use crate::device::Accelerator;
use crate::error::Result;
use crate::kernels::VECTOR_ADD;
use crate::program::VectorAddFunctor;

#[cfg(feature = "memtrace")]
use crate::memtracer::{self, Dir};
#[cfg(feature = "metrics")]
use std::time::Instant;

/// Global and optional local work size of a 1-D launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NdRange {
    pub global: usize,
    pub local: Option<usize>,
}

impl NdRange {
    pub fn new(global: usize) -> Self {
        Self {
            global,
            local: None,
        }
    }

    /// Restricts the launch to work-groups of `local` work-items.
    pub fn with_local(self, local: usize) -> Self {
        Self {
            local: Some(local),
            ..self
        }
    }

    /// One work-group of one work-item.
    pub fn single() -> Self {
        Self::new(1).with_local(1)
    }
}

/// Value bound to a kernel parameter.
#[derive(Clone, Copy, Debug)]
pub enum KernelArg {
    Mem(cl_mem),
    Int(cl_int),
}

/// Proof that a launch has completed, listing the buffers it was given.
/// Only produced by the launch functions of this module.
#[derive(Debug)]
pub struct KernelDone {
    buffers: Vec<cl_mem>,
}

impl KernelDone {
    fn of(args: &[KernelArg]) -> Self {
        let buffers = args
            .iter()
            .filter_map(|arg| match arg {
                KernelArg::Mem(mem) => Some(*mem),
                KernelArg::Int(_) => None,
            })
            .collect();
        Self { buffers }
    }

    /// Whether `mem` was bound to the completed launch.
    pub fn wrote(&self, mem: cl_mem) -> bool {
        self.buffers.contains(&mem)
    }
}

/// Binds `args` in order, enqueues the kernel and waits for it.
pub fn launch_nd_range(
    acc: &Accelerator,
    kernel: &Kernel,
    args: &[KernelArg],
    range: NdRange,
) -> Result<KernelDone> {
    #[cfg(feature = "memtrace")]
    let token = memtracer::start(Dir::Kernel, 0);
    #[cfg(feature = "metrics")]
    let t0 = Instant::now();

    let mut exec = ExecuteKernel::new(kernel);
    for arg in args {
        // SAFETY: each argument matches the kernel signature by construction
        // at the call sites; handles outlive the blocking launch below.
        unsafe {
            match arg {
                KernelArg::Mem(mem) => exec.set_arg(mem),
                KernelArg::Int(v) => exec.set_arg(v),
            };
        }
    }
    exec.set_global_work_size(range.global);
    if let Some(local) = range.local {
        exec.set_local_work_size(local);
    }

    // SAFETY: all arguments are set above.
    let event = unsafe { exec.enqueue_nd_range(acc.queue())? };
    event.wait()?;
    debug!(global = range.global, local = ?range.local, "kernel completed");

    #[cfg(feature = "metrics")]
    crate::metrics::record("kernel", t0);
    #[cfg(feature = "memtrace")]
    token.finish();

    Ok(KernelDone::of(args))
}

/// Single work-item launch.
pub fn launch_task(acc: &Accelerator, kernel: &Kernel, args: &[KernelArg]) -> Result<KernelDone> {
    launch_nd_range(acc, kernel, args, NdRange::single())
}

/// Copies `a` and `b` in, runs `vector_add` from `program` with one
/// work-item per element and copies the sums out.
pub fn device_vector_add(
    acc: &Accelerator,
    program: &Program,
    a: &[f32],
    b: &[f32],
    range: NdRange,
) -> Result<Vec<f32>> {
    let ctx = acc.context();
    let queue = acc.queue();

    let buffer_a = DeviceBuffer::<f32, ReadOnly, Allocated>::allocate(ctx, a.len())?;
    let buffer_b = DeviceBuffer::<f32, ReadOnly, Allocated>::allocate(ctx, b.len())?;
    let buffer_c = DeviceBuffer::<f32, WriteOnly, Allocated>::allocate(ctx, a.len())?;

    let buffer_a = buffer_a.write(queue, a)?;
    let buffer_b = buffer_b.write(queue, b)?;

    let functor = VectorAddFunctor::new(program, VECTOR_ADD)?;
    let buffer_c = functor.call(acc, range, &buffer_a, &buffer_b, buffer_c)?;

    buffer_c.to_vec(queue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_is_one_work_item() {
        assert_eq!(
            NdRange::single(),
            NdRange {
                global: 1,
                local: Some(1)
            }
        );
    }

    #[test]
    fn done_token_lists_only_buffer_args() {
        let mut slots = [0u8; 3];
        let base = slots.as_mut_ptr();
        let mem = |i: usize| base.wrapping_add(i).cast::<std::ffi::c_void>();
        let (a, b, other) = (mem(0), mem(1), mem(2));

        let done = KernelDone::of(&[KernelArg::Mem(a), KernelArg::Int(4), KernelArg::Mem(b)]);
        assert!(done.wrote(a));
        assert!(done.wrote(b));
        assert!(!done.wrote(other));
        assert_eq!(done.buffers.len(), 2);
    }

    #[test]
    fn with_local_keeps_global() {
        let r = NdRange::new(3).with_local(3);
        assert_eq!(r.global, 3);
        assert_eq!(r.local, Some(3));
    }
}
