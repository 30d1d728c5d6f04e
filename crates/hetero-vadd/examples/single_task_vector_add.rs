// Vector addition as a single task: one work-item loops over all elements,
// with the element count passed as a kernel argument.

use hetero_vadd::launch::{KernelArg, launch_task};
use hetero_vadd::vector::INTEROP_LEN;
use hetero_vadd::{
    Accelerator, Allocated, ClError, DeviceBuffer, ReadOnly, WriteOnly, build_from_source,
    check_sum, interop_inputs, kernels, logging,
};
use opencl3::kernel::Kernel;

fn main() -> Result<(), ClError> {
    logging::init();

    let (a, b) = interop_inputs(1);

    let acc = Accelerator::from_env()?;
    let (ctx, queue) = (acc.context(), acc.queue());

    let program = build_from_source(&acc, kernels::VADD_SRC)?;
    let kernel = Kernel::create(&program, kernels::VADD)?;

    let buffer_a = DeviceBuffer::<i32, ReadOnly, Allocated>::from_slice(ctx, queue, &a)?;
    let buffer_b = DeviceBuffer::<i32, ReadOnly, Allocated>::from_slice(ctx, queue, &b)?;
    let buffer_c = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, INTEROP_LEN)?;

    let done = launch_task(
        &acc,
        &kernel,
        &[
            KernelArg::Mem(buffer_a.mem()),
            KernelArg::Mem(buffer_b.mem()),
            KernelArg::Mem(buffer_c.mem()),
            KernelArg::Int(INTEROP_LEN as i32),
        ],
    )?;
    let c = buffer_c.produced_by(&done)?.to_vec(queue)?;

    check_sum(&a, &b, &c)?;
    println!("single task vadd OK: {c:?}");
    Ok(())
}
