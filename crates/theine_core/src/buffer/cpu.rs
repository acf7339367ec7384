use crate::{
    buffer::Buffer,
    device::Device,
    error::{Error, Result},
};

/// Host-memory buffer. Zero-initialized on allocation.
#[derive(Debug)]
pub struct CpuBuffer {
    data: Vec<f32>,
}

impl CpuBuffer {
    pub fn new(count: usize) -> Result<Self> {
        count
            .checked_mul(std::mem::size_of::<f32>())
            .ok_or(Error::OutOfMemory)?;
        Ok(Self {
            data: vec![0.0; count],
        })
    }
}

impl Buffer for CpuBuffer {
    fn as_slice(&self) -> &[f32] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn device(&self) -> Device {
        Device::Cpu
    }
}
