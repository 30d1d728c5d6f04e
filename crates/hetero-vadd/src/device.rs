//! Device, context and command-queue acquisition.

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::Device;
use opencl3::platform::get_platforms;
use tracing::{debug, info};

use crate::config::DeviceConfig;
use crate::error::{ClError, Result};

/// One device with its context and in-order command queue.
pub struct Accelerator {
    platform_name: String,
    device: Device,
    context: Context,
    queue: CommandQueue,
}

impl std::fmt::Debug for Accelerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accelerator")
            .field("platform_name", &self.platform_name)
            .field("device_name", &self.device_name())
            .finish()
    }
}

impl Accelerator {
    pub fn from_env() -> Result<Self> {
        Self::first_matching(&DeviceConfig::from_env()?)
    }

    /// Takes the first device of the configured type, in platform order,
    /// whose vendor passes the filter.
    pub fn first_matching(config: &DeviceConfig) -> Result<Self> {
        let platforms = get_platforms()?;
        if platforms.is_empty() {
            return Err(ClError::NoPlatform);
        }

        for platform in platforms {
            let platform_name = platform.name().unwrap_or_default();
            debug!(platform = %platform_name, "probing OpenCL platform");

            // A platform without devices of this type reports an error here.
            let Ok(device_ids) = platform.get_devices(config.device_type.cl_type()) else {
                continue;
            };

            for id in device_ids {
                let device = Device::new(id);
                let vendor = device.vendor().unwrap_or_default();
                if !config.vendor_matches(&vendor) {
                    debug!(%vendor, "skipping device, vendor filter");
                    continue;
                }

                let context = Context::from_device(&device)?;
                let queue = CommandQueue::create_default_with_properties(&context, 0, 0)?;
                let acc = Self {
                    platform_name,
                    device,
                    context,
                    queue,
                };
                info!(
                    platform = %acc.platform_name,
                    device = %acc.device_name(),
                    "acquired accelerator"
                );
                return Ok(acc);
            }
        }

        Err(ClError::NoContext)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_default()
    }
}
