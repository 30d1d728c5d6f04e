//! Compile-time markers for device buffer access and lifecycle.

use opencl3::memory::{CL_MEM_READ_ONLY, CL_MEM_READ_WRITE, CL_MEM_WRITE_ONLY};
use opencl3::types::cl_mem_flags;

mod sealed {
    pub trait Sealed {}
}

/// Lifecycle of a device buffer.
pub trait State: sealed::Sealed + std::fmt::Debug + Send + Sync {}

/// Device memory exists but holds nothing meaningful yet.
#[derive(Debug, Clone, Copy)]
pub struct Allocated;
impl sealed::Sealed for Allocated {}
impl State for Allocated {}

/// A host-to-device copy is still running.
#[derive(Debug, Clone, Copy)]
pub struct InFlight;
impl sealed::Sealed for InFlight {}
impl State for InFlight {}

/// Contents are valid on the device and may be read back.
#[derive(Debug, Clone, Copy)]
pub struct Ready;
impl sealed::Sealed for Ready {}
impl State for Ready {}

/// How kernels may touch the buffer.
pub trait Access: sealed::Sealed + std::fmt::Debug + Send + Sync {
    const FLAGS: cl_mem_flags;
}

#[derive(Debug, Clone, Copy)]
pub struct ReadOnly;
impl sealed::Sealed for ReadOnly {}
impl Access for ReadOnly {
    const FLAGS: cl_mem_flags = CL_MEM_READ_ONLY;
}

#[derive(Debug, Clone, Copy)]
pub struct WriteOnly;
impl sealed::Sealed for WriteOnly {}
impl Access for WriteOnly {
    const FLAGS: cl_mem_flags = CL_MEM_WRITE_ONLY;
}

#[derive(Debug, Clone, Copy)]
pub struct ReadWrite;
impl sealed::Sealed for ReadWrite {}
impl Access for ReadWrite {
    const FLAGS: cl_mem_flags = CL_MEM_READ_WRITE;
}
