//! Vector addition on accelerators through several binding styles.
//!
//! The crate holds the helpers shared by the example programs: the fixed
//! input vectors, a type-state device buffer over `opencl3`, the embedded
//! kernel sources, device acquisition, host-parallel fallbacks and an
//! in-process message-passing world.

pub mod buffer;
pub mod comm;
pub mod config;
pub mod device;
pub mod error;
pub mod host;
pub mod kernels;
pub mod launch;
pub mod logging;
pub mod program;
pub mod report;
pub mod stream;
pub mod vector;

#[cfg(feature = "metrics")]
pub mod metrics;
#[cfg(feature = "memtrace")]
pub mod memtracer;

pub use buffer::{
    Access, Allocated, DeviceBuffer, InFlight, ReadOnly, ReadWrite, Ready, State, TransferGuard,
    WriteOnly,
};
pub use comm::{Communicator, World, distributed_vector_add};
pub use config::{DeviceConfig, DeviceKind};
pub use device::Accelerator;
pub use error::{ClError, Result};
pub use launch::{KernelArg, KernelDone, NdRange, device_vector_add, launch_nd_range, launch_task};
pub use program::{VectorAddFunctor, build_from_binary, build_from_source};
pub use report::{format_result, print_result};
pub use vector::{A, B, EXPECTED, N, Vector, check_sum, interop_inputs, same_len};

#[cfg(feature = "metrics")]
pub use metrics::{ALLOC_BYTES, ALLOCS, record, summary};
#[cfg(feature = "memtrace")]
pub use memtracer::{CopyToken, Dir, flush_csv, start};
