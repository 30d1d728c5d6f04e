// Streaming example: 2 Mi integers pass through a kernel run by a single
// work-item that adds one to each.

use hetero_vadd::stream::{STREAM_LEN, iota, run_stream, verify_stream};
use hetero_vadd::{Accelerator, ClError, logging};

#[cfg(feature = "memtrace")]
use hetero_vadd::flush_csv;

fn main() -> Result<(), ClError> {
    logging::init();

    let acc = Accelerator::from_env()?;

    let input = iota(STREAM_LEN)?;
    let output = run_stream(&acc, &input)?;

    verify_stream(&input, &output)?;
    tracing::info!(elements = STREAM_LEN, "stream verified");

    #[cfg(feature = "memtrace")]
    flush_csv(std::path::Path::new("."))?;

    Ok(())
}
