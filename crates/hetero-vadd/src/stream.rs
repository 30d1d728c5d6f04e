//! Streaming example: one work-item walks the whole input and adds one.

use opencl3::kernel::Kernel;

use crate::buffer::{Allocated, DeviceBuffer, ReadOnly, WriteOnly};
use crate::device::Accelerator;
use crate::error::{ClError, Result};
use crate::kernels::{SIMPLE_STREAM, simple_stream_source};
use crate::launch::{KernelArg, launch_task};
use crate::program::build_from_source;

/// 2 Mi elements.
pub const STREAM_LEN: usize = 2 << 20;

/// `0, 1, 2, …` of length `len`; `len` must fit the kernel's `int` counter.
pub fn iota(len: usize) -> Result<Vec<i32>> {
    let end = i32::try_from(len).map_err(|_| ClError::Length {
        expected: i32::MAX as usize,
        found: len,
    })?;
    Ok((0..end).collect())
}

/// Fails with [`ClError::WrongResult`] unless `output[i] == input[i] + 1`.
pub fn verify_stream(input: &[i32], output: &[i32]) -> Result<()> {
    if input.len() != output.len() {
        return Err(ClError::Length {
            expected: input.len(),
            found: output.len(),
        });
    }
    if input.iter().zip(output).any(|(&i, &o)| i.checked_add(1) != Some(o)) {
        return Err(ClError::WrongResult);
    }
    Ok(())
}

/// Builds the generated kernel, streams `input` through it and returns the
/// output. The kernel runs as one work-group of one work-item.
pub fn run_stream(acc: &Accelerator, input: &[i32]) -> Result<Vec<i32>> {
    let ctx = acc.context();
    let queue = acc.queue();

    let ib = DeviceBuffer::<i32, ReadOnly, Allocated>::allocate(ctx, input.len())?;
    let ob = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, input.len())?;

    let program = build_from_source(acc, &simple_stream_source("int", input.len()))?;
    let kernel = Kernel::create(&program, SIMPLE_STREAM)?;

    let ib = ib.write(queue, input)?;
    let done = launch_task(acc, &kernel, &[KernelArg::Mem(ib.mem()), KernelArg::Mem(ob.mem())])?;
    let ob = ob.produced_by(&done)?;

    ob.to_vec(queue)
}
