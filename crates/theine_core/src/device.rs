#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a tensor or node lives within one process: host memory or one
/// of the GPU devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Device {
    Cpu,
    Gpu(usize),
}

impl Device {
    pub fn name(&self) -> String {
        match self {
            Device::Cpu => "CPU".to_string(),
            Device::Gpu(id) => format!("GPU{}", id),
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self, Device::Cpu)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
