// Vector addition through the typed functor: buffers initialised from host
// slices, one call over an N work-item range, one copy back.

use hetero_vadd::{
    A, Accelerator, Allocated, B, ClError, DeviceBuffer, N, NdRange, ReadOnly, VectorAddFunctor,
    WriteOnly, build_from_source, check_sum, kernels, logging, print_result,
};

#[cfg(feature = "metrics")]
use hetero_vadd::summary;

fn main() -> Result<(), ClError> {
    logging::init();

    let acc = Accelerator::from_env()?;
    let (ctx, queue) = (acc.context(), acc.queue());

    // read-only inputs, write-only output
    let buffer_a = DeviceBuffer::<f32, ReadOnly, Allocated>::from_slice(ctx, queue, &A)?;
    let buffer_b = DeviceBuffer::<f32, ReadOnly, Allocated>::from_slice(ctx, queue, &B)?;
    let buffer_c = DeviceBuffer::<f32, WriteOnly, Allocated>::allocate(ctx, N)?;

    let program = build_from_source(&acc, kernels::VECTOR_ADD_SRC)?;
    let k = VectorAddFunctor::new(&program, kernels::VECTOR_ADD)?;

    let buffer_c = k.call(&acc, NdRange::new(N), &buffer_a, &buffer_b, buffer_c)?;

    let mut c = [0.0_f32; N];
    buffer_c.read_into(queue, &mut c)?;

    check_sum(&A, &B, &c)?;
    print_result(&c);

    #[cfg(feature = "metrics")]
    summary();

    Ok(())
}
