// Parallel vector addition with synchronous message passing: one master and
// three workers, one worker per addition. For illustrative purposes only.

use hetero_vadd::{A, B, ClError, distributed_vector_add, logging, print_result};

fn main() -> Result<(), ClError> {
    logging::init();

    let c = distributed_vector_add(&A, &B)?;

    print_result(&c);
    Ok(())
}
