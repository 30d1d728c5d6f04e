// Vector addition as a parallel_for over shared memory: every index is an
// independent task writing its own output element.

use hetero_vadd::host::parallel_for;
use hetero_vadd::{A, B, ClError, N, logging, print_result};

fn main() -> Result<(), ClError> {
    logging::init();

    let c = parallel_for(N, |i| A[i] + B[i]);

    print_result(&c);
    Ok(())
}
