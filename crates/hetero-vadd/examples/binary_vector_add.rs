// Vector addition with a precompiled kernel binary, the usual route on FPGA
// boards where compiling at run time is not an option. Expects
// `vector_add.xclbin` in the kernel directory:
//
//   HETERO_VADD_DEVICE_TYPE=accelerator HETERO_VADD_VENDOR=xilinx \
//   HETERO_VADD_KERNEL_DIR=/path/to/build cargo run --example binary_vector_add

use hetero_vadd::{
    A, Accelerator, B, ClError, DeviceConfig, N, NdRange, build_from_binary, device_vector_add,
    kernels, logging, print_result,
};

fn main() -> Result<(), ClError> {
    logging::init();

    let config = DeviceConfig::from_env()?;
    let acc = Accelerator::first_matching(&config)?;

    let binary = kernels::load_binary(&config, "vector_add.xclbin")?;
    let program = build_from_binary(&acc, &binary)?;

    let c = device_vector_add(&acc, &program, &A, &B, NdRange::new(N).with_local(N))?;

    print_result(&c);
    Ok(())
}
