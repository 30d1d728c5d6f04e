// Vector addition as a data-parallel loop: inputs are mapped in, the output
// is mapped out, each element handled independently.

use hetero_vadd::host::parallel_vector_add;
use hetero_vadd::{A, B, ClError, N, Vector, check_sum, logging, print_result};

fn main() -> Result<(), ClError> {
    logging::init();

    let a: Vector = A;
    let b: Vector = B;
    let mut c: Vector = [0.0; N];

    parallel_vector_add(&a, &b, &mut c)?;

    check_sum(&a, &b, &c)?;
    print_result(&c);
    Ok(())
}
