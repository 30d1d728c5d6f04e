// Integer vector addition with non-blocking uploads: the inputs stay
// borrowed until their transfer guards are redeemed.

use hetero_vadd::vector::INTEROP_LEN;
use hetero_vadd::{
    Accelerator, Allocated, ClError, DeviceBuffer, NdRange, ReadOnly, VectorAddFunctor, WriteOnly,
    build_from_source, check_sum, interop_inputs, kernels, logging,
};

fn main() -> Result<(), ClError> {
    logging::init();

    let (a, b) = interop_inputs(42);

    let acc = Accelerator::from_env()?;
    let (ctx, queue) = (acc.context(), acc.queue());

    let program = build_from_source(&acc, kernels::VECTOR_ADD_INT_SRC)?;
    let k = VectorAddFunctor::new(&program, kernels::VECTOR_ADD)?;

    let a_dev = DeviceBuffer::<i32, ReadOnly, Allocated>::allocate(ctx, INTEROP_LEN)?;
    let b_dev = DeviceBuffer::<i32, ReadOnly, Allocated>::allocate(ctx, INTEROP_LEN)?;

    // both uploads in flight at once
    let (a_if, guard_a) = a_dev.enqueue_write(queue, &a)?;
    let (b_if, guard_b) = b_dev.enqueue_write(queue, &b)?;
    let buffer_a = a_if.into_ready(guard_a)?;
    let buffer_b = b_if.into_ready(guard_b)?;
    let buffer_c = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, INTEROP_LEN)?;

    let buffer_c = k.call(&acc, NdRange::new(INTEROP_LEN), &buffer_a, &buffer_b, buffer_c)?;
    let c = buffer_c.to_vec(queue)?;

    check_sum(&a, &b, &c)?;
    println!("interop vector_add OK: {c:?}");
    Ok(())
}
