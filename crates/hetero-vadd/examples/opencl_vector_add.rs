// Vector addition straight on the opencl3 API: walk the platforms until one
// yields a GPU context, then allocate, build, bind, launch and read back by
// hand.

use std::ptr;

use hetero_vadd::kernels::{VECTOR_ADD, VECTOR_ADD_SRC};
use hetero_vadd::{A, B, ClError, N, Vector, logging, print_result};

use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    device::{CL_DEVICE_TYPE_GPU, Device},
    kernel::{ExecuteKernel, Kernel},
    memory::{Buffer, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY, ClMem},
    platform::get_platforms,
    program::Program,
    types::CL_BLOCKING,
};

fn main() -> Result<(), ClError> {
    logging::init();

    let a: Vector = A;
    let b: Vector = B;
    let mut c: Vector = [0.0; N];

    // 1) first platform with a GPU
    let mut found = None;
    for platform in get_platforms()? {
        tracing::info!(platform = %platform.name().unwrap_or_default(), "trying platform");
        if let Some(&id) = platform
            .get_devices(CL_DEVICE_TYPE_GPU)
            .unwrap_or_default()
            .first()
        {
            found = Some(Device::new(id));
            break;
        }
    }
    let device = found.ok_or(ClError::NoContext)?;
    let context = Context::from_device(&device)?;
    let queue = CommandQueue::create_default_with_properties(&context, 0, 0)?;

    // 2) device buffers
    // SAFETY: no host pointers are passed to the runtime.
    let (mut buffer_a, mut buffer_b, buffer_c) = unsafe {
        (
            Buffer::<f32>::create(&context, CL_MEM_READ_ONLY, N, ptr::null_mut())?,
            Buffer::<f32>::create(&context, CL_MEM_READ_ONLY, N, ptr::null_mut())?,
            Buffer::<f32>::create(&context, CL_MEM_WRITE_ONLY, N, ptr::null_mut())?,
        )
    };

    // 3) program and kernel
    let program = Program::create_and_build_from_source(&context, VECTOR_ADD_SRC, "")
        .map_err(ClError::Build)?;
    let kernel = Kernel::create(&program, VECTOR_ADD)?;

    // 4) host -> device
    // SAFETY: blocking writes of N elements.
    unsafe {
        queue.enqueue_write_buffer(&mut buffer_a, CL_BLOCKING, 0, &a, &[])?;
        queue.enqueue_write_buffer(&mut buffer_b, CL_BLOCKING, 0, &b, &[])?;
    }

    // 5) launch N work-items
    // SAFETY: three buffer arguments, matching the kernel signature.
    let event = unsafe {
        ExecuteKernel::new(&kernel)
            .set_arg(&buffer_a.get())
            .set_arg(&buffer_b.get())
            .set_arg(&buffer_c.get())
            .set_global_work_size(N)
            .enqueue_nd_range(&queue)?
    };
    event.wait()?;

    // 6) device -> host
    // SAFETY: blocking read of N elements.
    unsafe {
        queue.enqueue_read_buffer(&buffer_c, CL_BLOCKING, 0, &mut c, &[])?;
    }

    print_result(&c);
    Ok(())
}
