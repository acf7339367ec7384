use theine_core::buffer::BufferManager;
use theine_core::device::Device;
use theine_core::error::Error;

#[test]
fn cpu_buffers_are_zeroed() {
    let buffer = BufferManager::create(16, Device::Cpu).unwrap();

    assert_eq!(buffer.len(), 16);
    assert!(buffer.as_slice().iter().all(|&v| v == 0.0));
    assert_eq!(buffer.device(), Device::Cpu);
}

#[test]
fn gpu_allocation_requires_accelerator_support() {
    let err = BufferManager::create(16, Device::Gpu(0)).unwrap_err();

    assert!(matches!(err, Error::InvalidDevice(_)));
}
