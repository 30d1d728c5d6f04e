// Vector addition through a fixed-size function whose loop is written to be
// pipelined one element per step, with sequential access to all three
// arrays.

use hetero_vadd::host::pipelined_vector_add;
use hetero_vadd::{A, B, ClError, N, logging, print_result};

fn main() -> Result<(), ClError> {
    logging::init();

    let a = A;
    let b = B;
    let mut c = [0.0_f32; N];

    pipelined_vector_add(&a, &b, &mut c);

    print_result(&c);
    Ok(())
}
