pub mod cpu;

use crate::{
    device::Device,
    error::{Error, Result},
};
use cpu::CpuBuffer;

/// Flat storage for one tensor allocation.
pub trait Buffer: Send + Sync + std::fmt::Debug {
    fn as_slice(&self) -> &[f32];
    fn as_mut_slice(&mut self) -> &mut [f32];
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn device(&self) -> Device;
}

pub struct BufferManager {}

impl BufferManager {
    pub fn create(count: usize, device: Device) -> Result<Box<dyn Buffer>> {
        match device {
            Device::Cpu => Ok(Box::new(CpuBuffer::new(count)?)),
            Device::Gpu(_) => Err(Error::InvalidDevice(format!(
                "{} allocation requires CUDA support, which this build does not carry",
                device.name()
            ))),
        }
    }
}
