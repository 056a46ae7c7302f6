use crate::{Bridge, BridgeHandle};

#[derive(Clone, Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device mismatch, requested device: {0}, actual device: {1}")]
    DeviceMismatch(String, String),
}

/// Where an array's heavy operations run.
#[derive(Clone, Default, PartialEq)]
pub enum Device {
    #[default]
    Host,
    Accelerated(BridgeHandle),
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Host => write!(f, "Host"),
            Device::Accelerated(bridge) => write!(f, "Accelerated:{}", bridge.name()),
        }
    }
}

impl Device {
    pub fn accelerated<B: Bridge + 'static>(bridge: B) -> Self {
        Device::Accelerated(BridgeHandle::new(bridge))
    }

    pub fn is_host(&self) -> bool {
        matches!(self, Device::Host)
    }

    pub fn is_accelerated(&self) -> bool {
        matches!(self, Device::Accelerated(_))
    }

    pub fn try_bridge(&self) -> Result<&BridgeHandle, DeviceError> {
        match self {
            Device::Accelerated(bridge) => Ok(bridge),
            Device::Host => Err(DeviceError::DeviceMismatch(
                "Accelerated".to_string(),
                "Host".to_string(),
            )),
        }
    }

    /// The accelerated device among `devices`, preferring the first.
    pub fn select_accelerated<'a>(devices: impl IntoIterator<Item = &'a Device>) -> Option<Device> {
        devices.into_iter().find(|d| d.is_accelerated()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_has_no_bridge() {
        let device = Device::Host;
        assert!(device.is_host());
        assert!(matches!(
            device.try_bridge(),
            Err(DeviceError::DeviceMismatch(_, _))
        ));
        assert_eq!(format!("{:?}", device), "Host");
    }

    #[test]
    fn test_select_accelerated() {
        assert_eq!(Device::select_accelerated([&Device::Host, &Device::Host]), None);
    }
}
