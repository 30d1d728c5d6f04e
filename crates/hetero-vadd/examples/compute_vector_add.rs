// Vector addition with the kernel read from `vector_add.cl` in the kernel
// directory, launched as a single work-group of N work-items.
//
// HETERO_VADD_DEVICE_TYPE / HETERO_VADD_VENDOR pick the device, e.g.
//   HETERO_VADD_VENDOR=intel cargo run --example compute_vector_add

use hetero_vadd::{
    A, Accelerator, B, ClError, DeviceConfig, N, NdRange, build_from_source, device_vector_add,
    kernels, logging, print_result,
};

fn main() -> Result<(), ClError> {
    logging::init();

    let config = DeviceConfig::from_env()?;
    let acc = Accelerator::first_matching(&config)?;
    tracing::info!(
        platform = acc.platform_name(),
        device = %acc.device_name(),
        "running vector_add"
    );

    let source = kernels::load_source(&config, "vector_add.cl")?;
    let program = build_from_source(&acc, &source)?;

    // use only one compute unit
    let c = device_vector_add(&acc, &program, &A, &B, NdRange::new(N).with_local(N))?;

    print_result(&c);
    Ok(())
}
