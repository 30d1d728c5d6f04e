//! Typed OpenCL buffers whose lifecycle is checked at compile time.
//!
//! A buffer starts [`Allocated`]; a non-blocking upload turns it
//! [`InFlight`] until its [`TransferGuard`] is redeemed, after which it is
//! [`Ready`] and can be read back. Kernel outputs become `Ready` through the
//! [`KernelDone`] token of the launch that wrote them.

mod state;

pub use state::{Access, Allocated, InFlight, ReadOnly, ReadWrite, Ready, State, WriteOnly};

use std::marker::PhantomData;
use std::ptr;

use bytemuck::Pod;
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::event::Event;
use opencl3::memory::{Buffer, ClMem};
use opencl3::types::{CL_BLOCKING, CL_NON_BLOCKING, cl_mem};
use tracing::{debug, warn};

use crate::error::{ClError, Result};
use crate::launch::KernelDone;

#[cfg(feature = "memtrace")]
use crate::memtracer::{self, CopyToken, Dir};
#[cfg(feature = "metrics")]
use std::{sync::atomic::Ordering, time::Instant};

pub struct DeviceBuffer<T: Pod, M: Access, S: State> {
    inner: Buffer<T>,
    len: usize,
    _marker: PhantomData<(M, S)>,
}

impl<T: Pod, M: Access, S: State> std::fmt::Debug for DeviceBuffer<T, M, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("len", &self.len)
            .field("access", &std::any::type_name::<M>())
            .field("state", &std::any::type_name::<S>())
            .finish()
    }
}

/// Proof that a non-blocking upload was enqueued. Borrows the host data
/// until the copy is known to be complete; dropping it blocks until then.
#[must_use = "an upload is only complete once its guard is redeemed"]
pub struct TransferGuard<'a> {
    // `None` once waited on
    event: Option<Event>,
    #[cfg(feature = "memtrace")]
    token: Option<CopyToken>,
    _host: PhantomData<&'a [u8]>,
}

impl TransferGuard<'_> {
    fn wait(&mut self) -> Result<()> {
        if let Some(event) = self.event.take() {
            event.wait()?;
        }
        #[cfg(feature = "memtrace")]
        if let Some(token) = self.token.take() {
            token.finish();
        }
        Ok(())
    }
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        // The runtime may still be reading the borrowed host slice.
        if let Err(e) = self.wait() {
            warn!(error = %e, "waiting for a dropped upload failed");
        }
    }
}

impl<T: Pod, M: Access, S: State> DeviceBuffer<T, M, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn byte_len(&self) -> usize {
        self.len * std::mem::size_of::<T>()
    }

    pub fn raw(&self) -> &Buffer<T> {
        &self.inner
    }

    /// Handle to pass as a kernel argument.
    pub fn mem(&self) -> cl_mem {
        self.inner.get()
    }

    fn check_len(&self, found: usize) -> Result<()> {
        if found != self.len {
            return Err(ClError::Length {
                expected: self.len,
                found,
            });
        }
        Ok(())
    }

    fn transition<N: State>(self) -> DeviceBuffer<T, M, N> {
        DeviceBuffer {
            inner: self.inner,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T: Pod, M: Access> DeviceBuffer<T, M, Allocated> {
    pub fn allocate(context: &Context, len: usize) -> Result<Self> {
        // SAFETY: no host pointer is handed to the runtime.
        let inner = unsafe { Buffer::<T>::create(context, M::FLAGS, len, ptr::null_mut())? };

        #[cfg(feature = "metrics")]
        {
            crate::metrics::ALLOCS.fetch_add(1, Ordering::Relaxed);
            crate::metrics::ALLOC_BYTES
                .fetch_add(len * std::mem::size_of::<T>(), Ordering::Relaxed);
        }
        debug!(len, access = std::any::type_name::<M>(), "allocated device buffer");

        Ok(Self {
            inner,
            len,
            _marker: PhantomData,
        })
    }

    /// Allocates and uploads `data` with a blocking write.
    pub fn from_slice(
        context: &Context,
        queue: &CommandQueue,
        data: &[T],
    ) -> Result<DeviceBuffer<T, M, Ready>> {
        Self::allocate(context, data.len())?.write(queue, data)
    }

    /// Blocking host-to-device copy.
    pub fn write(mut self, queue: &CommandQueue, data: &[T]) -> Result<DeviceBuffer<T, M, Ready>> {
        self.check_len(data.len())?;

        #[cfg(feature = "memtrace")]
        let token = memtracer::start(Dir::H2D, self.byte_len());
        #[cfg(feature = "metrics")]
        let t0 = Instant::now();

        // SAFETY: blocking write, `data` outlives the copy.
        unsafe {
            queue.enqueue_write_buffer(&mut self.inner, CL_BLOCKING, 0, data, &[])?;
        }

        #[cfg(feature = "metrics")]
        crate::metrics::record_transfer("enqueue_write", t0, self.byte_len());
        #[cfg(feature = "memtrace")]
        token.finish();

        Ok(self.transition())
    }

    /// Non-blocking host-to-device copy. `data` stays borrowed until the
    /// returned guard is redeemed with [`DeviceBuffer::into_ready`].
    pub fn enqueue_write<'a>(
        mut self,
        queue: &CommandQueue,
        data: &'a [T],
    ) -> Result<(DeviceBuffer<T, M, InFlight>, TransferGuard<'a>)> {
        self.check_len(data.len())?;

        #[cfg(feature = "memtrace")]
        let token = memtracer::start(Dir::H2D, self.byte_len());
        #[cfg(feature = "metrics")]
        let t0 = Instant::now();

        // SAFETY: the guard borrows `data` for 'a and is only released
        // after the event completed.
        let event = unsafe {
            queue.enqueue_write_buffer(&mut self.inner, CL_NON_BLOCKING, 0, data, &[])?
        };

        #[cfg(feature = "metrics")]
        crate::metrics::record_transfer("enqueue_write", t0, self.byte_len());

        let guard = TransferGuard {
            event: Some(event),
            #[cfg(feature = "memtrace")]
            token: Some(token),
            _host: PhantomData,
        };
        Ok((self.transition(), guard))
    }

    /// Marks a kernel output as valid once the launch that wrote it is done.
    /// The buffer must have been an argument of that launch.
    pub fn produced_by(self, done: &KernelDone) -> Result<DeviceBuffer<T, M, Ready>> {
        if !done.wrote(self.mem()) {
            return Err(ClError::NotLaunchOutput);
        }
        Ok(self.transition())
    }
}

impl<T: Pod, M: Access> DeviceBuffer<T, M, InFlight> {
    /// Waits for the upload behind `guard`.
    pub fn into_ready(self, mut guard: TransferGuard<'_>) -> Result<DeviceBuffer<T, M, Ready>> {
        guard.wait()?;
        Ok(self.transition())
    }
}

impl<T: Pod, M: Access> DeviceBuffer<T, M, Ready> {
    /// Blocking device-to-host copy into `out`.
    pub fn read_into(&self, queue: &CommandQueue, out: &mut [T]) -> Result<()> {
        self.check_len(out.len())?;

        #[cfg(feature = "memtrace")]
        let token = memtracer::start(Dir::D2H, self.byte_len());
        #[cfg(feature = "metrics")]
        let t0 = Instant::now();

        // SAFETY: blocking read into a slice of exactly `len` elements.
        unsafe {
            queue.enqueue_read_buffer(&self.inner, CL_BLOCKING, 0, out, &[])?;
        }

        #[cfg(feature = "metrics")]
        crate::metrics::record_transfer("enqueue_read", t0, self.byte_len());
        #[cfg(feature = "memtrace")]
        token.finish();

        Ok(())
    }

    pub fn to_vec(&self, queue: &CommandQueue) -> Result<Vec<T>> {
        let mut out = vec![<T as bytemuck::Zeroable>::zeroed(); self.len];
        self.read_into(queue, &mut out)?;
        Ok(out)
    }
}
