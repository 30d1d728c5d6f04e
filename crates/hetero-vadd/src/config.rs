//! Environment-driven device configuration.
//!
//! Read once by each example before acquiring a device:
//!
//! - `HETERO_VADD_DEVICE_TYPE`: `gpu` (default), `accelerator`, `cpu` or `all`
//! - `HETERO_VADD_VENDOR`: case-insensitive substring of the device vendor
//! - `HETERO_VADD_KERNEL_DIR`: directory holding `.cl` sources and binaries
//!
//! For example `HETERO_VADD_DEVICE_TYPE=accelerator HETERO_VADD_VENDOR=xilinx`
//! will probably pick an FPGA board.

use std::path::PathBuf;
use std::str::FromStr;

use opencl3::device::{
    CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU,
};
use opencl3::types::cl_device_type;

use crate::error::{ClError, Result};

pub const DEVICE_TYPE_VAR: &str = "HETERO_VADD_DEVICE_TYPE";
pub const VENDOR_VAR: &str = "HETERO_VADD_VENDOR";
pub const KERNEL_DIR_VAR: &str = "HETERO_VADD_KERNEL_DIR";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceKind {
    #[default]
    Gpu,
    Accelerator,
    Cpu,
    All,
}

impl DeviceKind {
    pub fn cl_type(self) -> cl_device_type {
        match self {
            DeviceKind::Gpu => CL_DEVICE_TYPE_GPU,
            DeviceKind::Accelerator => CL_DEVICE_TYPE_ACCELERATOR,
            DeviceKind::Cpu => CL_DEVICE_TYPE_CPU,
            DeviceKind::All => CL_DEVICE_TYPE_ALL,
        }
    }
}

impl FromStr for DeviceKind {
    type Err = ClError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpu" => Ok(DeviceKind::Gpu),
            "accelerator" | "fpga" => Ok(DeviceKind::Accelerator),
            "cpu" => Ok(DeviceKind::Cpu),
            "all" => Ok(DeviceKind::All),
            other => Err(ClError::Config(format!(
                "{DEVICE_TYPE_VAR}: unknown device type `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    pub device_type: DeviceKind,
    pub vendor: Option<String>,
    pub kernel_dir: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_type: DeviceKind::default(),
            vendor: None,
            kernel_dir: default_kernel_dir(),
        }
    }
}

impl DeviceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup; empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let device_type = match get(DEVICE_TYPE_VAR) {
            Some(v) => v.parse()?,
            None => DeviceKind::default(),
        };
        let vendor = get(VENDOR_VAR).map(|v| v.trim().to_string());
        let kernel_dir = get(KERNEL_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_kernel_dir);

        Ok(Self {
            device_type,
            vendor,
            kernel_dir,
        })
    }

    /// Case-insensitive vendor filter; no filter matches everything.
    pub fn vendor_matches(&self, vendor: &str) -> bool {
        match &self.vendor {
            Some(wanted) => vendor
                .to_ascii_lowercase()
                .contains(&wanted.to_ascii_lowercase()),
            None => true,
        }
    }
}

fn default_kernel_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("kernels")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_gpu_without_vendor() {
        let cfg = DeviceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, DeviceConfig::default());
        assert_eq!(cfg.device_type.cl_type(), CL_DEVICE_TYPE_GPU);
        assert!(cfg.kernel_dir.ends_with("kernels"));
    }

    #[test]
    fn reads_type_vendor_and_dir() {
        let cfg = DeviceConfig::from_lookup(lookup(&[
            (DEVICE_TYPE_VAR, "FPGA"),
            (VENDOR_VAR, " Xilinx "),
            (KERNEL_DIR_VAR, "/opt/kernels"),
        ]))
        .unwrap();
        assert_eq!(cfg.device_type, DeviceKind::Accelerator);
        assert_eq!(cfg.vendor.as_deref(), Some("Xilinx"));
        assert_eq!(cfg.kernel_dir, PathBuf::from("/opt/kernels"));
    }

    #[test]
    fn empty_values_are_unset() {
        let cfg = DeviceConfig::from_lookup(lookup(&[(DEVICE_TYPE_VAR, ""), (VENDOR_VAR, "  ")]))
            .unwrap();
        assert_eq!(cfg.device_type, DeviceKind::Gpu);
        assert_eq!(cfg.vendor, None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = DeviceConfig::from_lookup(lookup(&[(DEVICE_TYPE_VAR, "tpu")])).unwrap_err();
        assert!(matches!(err, ClError::Config(_)));
    }

    #[test]
    fn vendor_filter_ignores_case() {
        let cfg = DeviceConfig {
            vendor: Some("intel".into()),
            ..DeviceConfig::default()
        };
        assert!(cfg.vendor_matches("Intel(R) Corporation"));
        assert!(!cfg.vendor_matches("NVIDIA Corporation"));
        assert!(DeviceConfig::default().vendor_matches("anything"));
    }
}
