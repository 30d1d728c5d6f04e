//! End-to-end runs on a real OpenCL device.
//!
//! Run with `cargo test -- --ignored` on a machine with an OpenCL GPU (or
//! set `HETERO_VADD_DEVICE_TYPE`).

use hetero_vadd::kernels::{self, VADD, VADD_SRC};
use hetero_vadd::launch::{KernelArg, launch_task};
use hetero_vadd::stream::{iota, run_stream, verify_stream};
use hetero_vadd::vector::INTEROP_LEN;
use hetero_vadd::{
    A, Accelerator, Allocated, B, ClError, DeviceBuffer, EXPECTED, N, NdRange, ReadOnly,
    VectorAddFunctor, WriteOnly, build_from_source, check_sum, device_vector_add, interop_inputs,
};
use opencl3::kernel::Kernel;
use opencl3::types::CL_BLOCKING;
use pretty_assertions::assert_eq;

fn accelerator() -> Accelerator {
    Accelerator::from_env().expect("an OpenCL device")
}

#[test]
#[ignore = "requires an OpenCL device"]
fn device_vector_add_matches_expected() {
    let acc = accelerator();
    let program = build_from_source(&acc, kernels::VECTOR_ADD_SRC).unwrap();
    let c = device_vector_add(&acc, &program, &A, &B, NdRange::new(N)).unwrap();
    assert_eq!(c, EXPECTED.to_vec());
}

#[test]
#[ignore = "requires an OpenCL device"]
fn single_work_group_launch_matches_expected() {
    let acc = accelerator();
    let program = build_from_source(&acc, kernels::VECTOR_ADD_SRC).unwrap();
    let c = device_vector_add(&acc, &program, &A, &B, NdRange::new(N).with_local(N)).unwrap();
    assert_eq!(c, EXPECTED.to_vec());
}

#[test]
#[ignore = "requires an OpenCL device"]
fn non_blocking_uploads_feed_int_kernel() {
    let acc = accelerator();
    let (ctx, queue) = (acc.context(), acc.queue());
    let (a, b) = interop_inputs(42);

    let program = build_from_source(&acc, kernels::VECTOR_ADD_INT_SRC).unwrap();
    let k = VectorAddFunctor::new(&program, kernels::VECTOR_ADD).unwrap();

    let (a_if, ga) = DeviceBuffer::<i32, ReadOnly, Allocated>::allocate(ctx, INTEROP_LEN)
        .unwrap()
        .enqueue_write(queue, &a)
        .unwrap();
    let (b_if, gb) = DeviceBuffer::<i32, ReadOnly, Allocated>::allocate(ctx, INTEROP_LEN)
        .unwrap()
        .enqueue_write(queue, &b)
        .unwrap();
    let a_dev = a_if.into_ready(ga).unwrap();
    let b_dev = b_if.into_ready(gb).unwrap();
    let c_dev = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, INTEROP_LEN).unwrap();

    let c = k
        .call(&acc, NdRange::new(INTEROP_LEN), &a_dev, &b_dev, c_dev)
        .unwrap()
        .to_vec(queue)
        .unwrap();
    check_sum(&a, &b, &c).unwrap();
}

#[test]
#[ignore = "requires an OpenCL device"]
fn single_task_loops_over_size_argument() {
    let acc = accelerator();
    let (ctx, queue) = (acc.context(), acc.queue());
    let (a, b) = interop_inputs(1);

    let program = build_from_source(&acc, VADD_SRC).unwrap();
    let kernel = Kernel::create(&program, VADD).unwrap();
    let a_dev = DeviceBuffer::<i32, ReadOnly, Allocated>::from_slice(ctx, queue, &a).unwrap();
    let b_dev = DeviceBuffer::<i32, ReadOnly, Allocated>::from_slice(ctx, queue, &b).unwrap();
    let c_dev = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, INTEROP_LEN).unwrap();

    let done = launch_task(
        &acc,
        &kernel,
        &[
            KernelArg::Mem(a_dev.mem()),
            KernelArg::Mem(b_dev.mem()),
            KernelArg::Mem(c_dev.mem()),
            KernelArg::Int(INTEROP_LEN as i32),
        ],
    )
    .unwrap();
    let c = c_dev.produced_by(&done).unwrap().to_vec(queue).unwrap();
    assert_eq!(c, vec![1, 3, 5, 7]);
}

#[test]
#[ignore = "requires an OpenCL device"]
fn stream_adds_one() {
    let acc = accelerator();
    let input = iota(1 << 12).unwrap();
    let output = run_stream(&acc, &input).unwrap();
    verify_stream(&input, &output).unwrap();
}

#[test]
#[ignore = "requires an OpenCL device"]
fn write_rejects_wrong_length() {
    let acc = accelerator();
    let buf = DeviceBuffer::<f32, ReadOnly, Allocated>::allocate(acc.context(), N).unwrap();
    let err = buf.write(acc.queue(), &[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, ClError::Length { expected: 3, found: 2 }));
}

#[test]
#[ignore = "requires an OpenCL device"]
fn broken_source_reports_build_log() {
    let acc = accelerator();
    let err = build_from_source(&acc, "__kernel void broken(").unwrap_err();
    assert!(matches!(err, ClError::Build(_)));
}

#[test]
#[ignore = "requires an OpenCL device"]
fn dropped_upload_guard_waits_for_copy() {
    let acc = accelerator();
    let (ctx, queue) = (acc.context(), acc.queue());
    let mut host = vec![7_i32; 1 << 16];

    let buf = DeviceBuffer::<i32, ReadOnly, Allocated>::allocate(ctx, host.len()).unwrap();
    let (in_flight, guard) = buf.enqueue_write(queue, &host).unwrap();
    drop(guard);

    // the copy has finished, so clobbering the source must not leak through
    host.iter_mut().for_each(|x| *x = -1);
    drop(host);

    let mut uploaded = vec![0_i32; in_flight.len()];
    // SAFETY: blocking read of exactly `len` elements.
    unsafe {
        queue
            .enqueue_read_buffer(in_flight.raw(), CL_BLOCKING, 0, &mut uploaded, &[])
            .unwrap();
    }
    assert!(uploaded.iter().all(|&x| x == 7));
}

#[test]
#[ignore = "requires an OpenCL device"]
fn produced_by_rejects_buffer_outside_launch() {
    let acc = accelerator();
    let (ctx, queue) = (acc.context(), acc.queue());
    let (a, b) = interop_inputs(1);

    let program = build_from_source(&acc, VADD_SRC).unwrap();
    let kernel = Kernel::create(&program, VADD).unwrap();
    let a_dev = DeviceBuffer::<i32, ReadOnly, Allocated>::from_slice(ctx, queue, &a).unwrap();
    let b_dev = DeviceBuffer::<i32, ReadOnly, Allocated>::from_slice(ctx, queue, &b).unwrap();
    let c_dev = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, INTEROP_LEN).unwrap();
    let unrelated = DeviceBuffer::<i32, WriteOnly, Allocated>::allocate(ctx, INTEROP_LEN).unwrap();

    let done = launch_task(
        &acc,
        &kernel,
        &[
            KernelArg::Mem(a_dev.mem()),
            KernelArg::Mem(b_dev.mem()),
            KernelArg::Mem(c_dev.mem()),
            KernelArg::Int(INTEROP_LEN as i32),
        ],
    )
    .unwrap();

    assert!(matches!(unrelated.produced_by(&done), Err(ClError::NotLaunchOutput)));
    assert!(c_dev.produced_by(&done).is_ok());
}
