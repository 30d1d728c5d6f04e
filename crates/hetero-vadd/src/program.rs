//! Program construction and the typed vector-add functor.

use bytemuck::Pod;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use tracing::debug;

use crate::buffer::{Allocated, DeviceBuffer, ReadOnly, Ready, WriteOnly};
use crate::device::Accelerator;
use crate::error::{ClError, Result};
use crate::launch::{KernelArg, NdRange, launch_nd_range};
use crate::vector::same_len;

/// Compiles OpenCL C source for the accelerator's context. The build log
/// is returned in [`ClError::Build`] on failure.
pub fn build_from_source(acc: &Accelerator, src: &str) -> Result<Program> {
    let program = Program::create_and_build_from_source(acc.context(), src, "")
        .map_err(ClError::Build)?;
    debug!(device = %acc.device_name(), "built program from source");
    Ok(program)
}

/// Loads a precompiled device binary, as produced offline for FPGAs.
pub fn build_from_binary(acc: &Accelerator, binary: &[u8]) -> Result<Program> {
    let program = Program::create_and_build_from_binary(acc.context(), &[binary], "")
        .map_err(|e| ClError::Build(String::from(e)))?;
    debug!(bytes = binary.len(), "built program from binary");
    Ok(program)
}

/// Callable kernel taking two inputs and one output buffer.
pub struct VectorAddFunctor {
    kernel: Kernel,
}

impl std::fmt::Debug for VectorAddFunctor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorAddFunctor")
            .field("function_name", &self.kernel.function_name().unwrap_or_default())
            .finish()
    }
}

impl VectorAddFunctor {
    pub fn new(program: &Program, name: &str) -> Result<Self> {
        Ok(Self {
            kernel: Kernel::create(program, name)?,
        })
    }

    /// Launches over `range` and blocks until `c` holds the sums.
    pub fn call<T: Pod>(
        &self,
        acc: &Accelerator,
        range: NdRange,
        a: &DeviceBuffer<T, ReadOnly, Ready>,
        b: &DeviceBuffer<T, ReadOnly, Ready>,
        c: DeviceBuffer<T, WriteOnly, Allocated>,
    ) -> Result<DeviceBuffer<T, WriteOnly, Ready>> {
        same_len(c.len(), &[a.len(), b.len()])?;
        let args = [
            KernelArg::Mem(a.mem()),
            KernelArg::Mem(b.mem()),
            KernelArg::Mem(c.mem()),
        ];
        let done = launch_nd_range(acc, &self.kernel, &args, range)?;
        c.produced_by(&done)
    }
}
