//! OpenCL C sources of the demo kernels.

use std::fs;
use std::path::PathBuf;

use crate::config::DeviceConfig;
use crate::error::{ClError, Result};

/// One work-item per element.
pub const VECTOR_ADD_SRC: &str = include_str!("../kernels/vector_add.cl");
pub const VECTOR_ADD: &str = "vector_add";

/// Integer variant of [`VECTOR_ADD_SRC`] used by the interop example.
pub const VECTOR_ADD_INT_SRC: &str = r#"
__kernel void vector_add(const __global int *a,
                         const __global int *b,
                         __global int *c) {
  c[get_global_id(0)] = a[get_global_id(0)] + b[get_global_id(0)];
}
"#;

/// Single work-item kernel looping over a `size` argument.
pub const VADD_SRC: &str = include_str!("../kernels/vadd.cl");
pub const VADD: &str = "vadd";

pub const SIMPLE_STREAM: &str = "simple_stream";

/// Streaming kernel with element type and count inlined as literals; it is
/// meant to run as a single work-item.
pub fn simple_stream_source(ty: &str, n: usize) -> String {
    format!(
        r#"
__kernel void
{SIMPLE_STREAM}(const __global {ty} *ib,
              __global {ty} *ob) {{
  for (int i = 0; i != {n}; ++i)
    ob[i] = ib[i] + 1;
}}
"#
    )
}

fn kernel_path(config: &DeviceConfig, file: &str) -> PathBuf {
    config.kernel_dir.join(file)
}

/// Reads a kernel source file from the configured kernel directory.
pub fn load_source(config: &DeviceConfig, file: &str) -> Result<String> {
    let path = kernel_path(config, file);
    fs::read_to_string(&path).map_err(|source| ClError::KernelFile { path, source })
}

/// Reads a precompiled program binary (e.g. an FPGA `.xclbin`).
pub fn load_binary(config: &DeviceConfig, file: &str) -> Result<Vec<u8>> {
    let path = kernel_path(config, file);
    fs::read(&path).map_err(|source| ClError::KernelFile { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_source_inlines_type_and_count() {
        let src = simple_stream_source("int", 4194304);
        assert!(src.contains("simple_stream(const __global int *ib"));
        assert!(src.contains("__global int *ob"));
        assert!(src.contains("i != 4194304"));
        assert!(src.contains("ob[i] = ib[i] + 1;"));
    }

    #[test]
    fn shipped_source_matches_embedded() {
        let cfg = DeviceConfig::default();
        assert_eq!(load_source(&cfg, "vector_add.cl").unwrap(), VECTOR_ADD_SRC);
    }

    #[test]
    fn missing_binary_names_path() {
        let cfg = DeviceConfig::default();
        let err = load_binary(&cfg, "does_not_exist.xclbin").unwrap_err();
        match err {
            ClError::KernelFile { path, .. } => assert!(path.ends_with("does_not_exist.xclbin")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
