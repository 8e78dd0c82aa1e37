use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::Device;
use crate::error::{Error, Result};
use tracing::info;

/// Which compute the model may be bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DevicePreference {
    /// First available accelerator, CPU otherwise.
    #[default]
    Auto,
    Cpu,
}

/// Accelerators compiled in and present on this host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accelerators {
    pub cuda: bool,
    pub metal: bool,
}

impl Accelerators {
    pub fn probe() -> Self {
        Self {
            cuda: cuda_is_available(),
            metal: metal_is_available(),
        }
    }
}

/// Picks the device once at startup.
pub fn select_device(preference: DevicePreference) -> Result<Device> {
    select_from(preference, Accelerators::probe())
}

pub fn select_from(preference: DevicePreference, available: Accelerators) -> Result<Device> {
    let device = match preference {
        DevicePreference::Auto if available.cuda => {
            Device::new_cuda(0).map_err(Error::unavailable)?
        }
        DevicePreference::Auto if available.metal => {
            Device::new_metal(0).map_err(Error::unavailable)?
        }
        _ => Device::Cpu,
    };
    info!(device = device_name(&device), ?preference, "selected compute device");
    Ok(device)
}

pub fn device_name(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}
