use crate::buffer::{Buffer, BufferManager};
use crate::context::current_rank;
use crate::device::Device;
use crate::dims::{Offset, Size, Stride};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Storage = Arc<RwLock<Option<Box<dyn Buffer>>>>;

/// A 4-D view into a reference-counted flat buffer owned by one
/// (rank, device) location.
///
/// Cloning a tensor is cheap and yields another view of the same
/// storage; the backing buffer is allocated lazily on first mutable
/// access and only by the owning rank. Views created by `slice_from`
/// and `share_from` alias the same allocation with their own
/// size/offset/stride.
#[derive(Clone)]
pub struct Tensor {
    size: Size,
    offset: Offset,
    stride: Stride,
    rank: usize,
    device: Device,
    data: Storage,
}

impl Tensor {
    /// A new contiguous, unallocated tensor.
    pub fn new(rank: usize, device: Device, size: Size) -> Self {
        Self {
            size,
            offset: Offset::zero(),
            stride: Stride::from(size),
            rank,
            device,
            data: Arc::new(RwLock::new(None)),
        }
    }

    /// A view with explicit offset and stride, possibly non-contiguous.
    pub fn with_view(rank: usize, device: Device, size: Size, offset: Offset, stride: Stride) -> Self {
        Self {
            size,
            offset,
            stride,
            rank,
            device,
            data: Arc::new(RwLock::new(None)),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn is_contiguous(&self) -> bool {
        Stride::from(self.size) == self.stride
    }

    /// This view's starting position in the flat buffer.
    pub fn linear_offset(&self) -> usize {
        self.offset.linear(&self.stride)
    }

    pub fn has_data(&self) -> bool {
        self.lock_read().is_some()
    }

    /// Address of the backing allocation, for aliasing checks. `None`
    /// until allocated.
    pub fn buffer_id(&self) -> Option<usize> {
        self.lock_read()
            .as_deref()
            .map(|buffer| buffer.as_slice().as_ptr() as usize)
    }

    /// Read access starting at this view's linear offset. The buffer
    /// must already be allocated.
    pub fn data(&self) -> TensorData<'_> {
        let guard = self.lock_read();
        assert!(guard.is_some(), "tensor data read before allocation");
        TensorData {
            guard,
            start: self.linear_offset(),
        }
    }

    /// Mutable access starting at this view's linear offset, allocating
    /// the backing buffer on first use. Fatal when invoked from a rank
    /// other than the owning rank, or when lazy allocation would be
    /// needed for a non-contiguous view.
    pub fn mutable_data(&self) -> TensorDataMut<'_> {
        assert_eq!(
            current_rank(),
            self.rank,
            "cannot access data of a rank-{} tensor from rank {}",
            self.rank,
            current_rank()
        );
        let mut guard = self.lock_write();
        if guard.is_none() {
            assert!(self.size.count() > 0, "cannot allocate an empty tensor");
            assert!(
                self.is_contiguous(),
                "lazy allocation requires a contiguous tensor"
            );
            let buffer = BufferManager::create(self.size.count(), self.device)
                .unwrap_or_else(|err| {
                    panic!(
                        "failed to allocate {} elements on {}: {}",
                        self.size.count(),
                        self.device.name(),
                        err
                    )
                });
            *guard = Some(buffer);
        }
        TensorDataMut {
            guard,
            start: self.linear_offset(),
        }
    }

    /// Exchanges the backing buffers of two identically-shaped views in
    /// O(1), the hand-off from producer to consumer without copying.
    /// Callers rely on `sync()` as the barrier guaranteeing the producer
    /// finished writing.
    pub fn swap_memory(&self, other: &Tensor) {
        assert_eq!(self.size, other.size, "swap_memory: size mismatch");
        assert_eq!(self.stride, other.stride, "swap_memory: stride mismatch");
        assert_eq!(self.offset, other.offset, "swap_memory: offset mismatch");
        if Arc::ptr_eq(&self.data, &other.data) {
            return;
        }
        // Lock in address order so two concurrent swaps cannot deadlock.
        let (first, second) = if Arc::as_ptr(&self.data) < Arc::as_ptr(&other.data) {
            (&self.data, &other.data)
        } else {
            (&other.data, &self.data)
        };
        let mut a = first.write().unwrap_or_else(|e| e.into_inner());
        let mut b = second.write().unwrap_or_else(|e| e.into_inner());
        std::mem::swap(&mut *a, &mut *b);
    }

    /// Re-points this view at a sub-tensor of `other`, discarding any
    /// storage it previously referenced.
    pub fn slice_from(&mut self, other: &Tensor, offset: Offset, size: Size) {
        self.rank = other.rank;
        self.device = other.device;
        self.stride = other.stride;
        self.data = Arc::clone(&other.data);
        self.size = size;
        self.offset = other.offset + offset;
    }

    /// Turns this view into a full alias of `other`.
    pub fn share_from(&mut self, other: &Tensor) {
        self.rank = other.rank;
        self.device = other.device;
        self.stride = other.stride;
        self.data = Arc::clone(&other.data);
        self.size = other.size;
        self.offset = other.offset;
    }

    /// Drops the backing buffer of this view and everything sharing it.
    pub fn delete_data(&self) {
        *self.lock_write() = None;
    }

    fn lock_read(&self) -> RwLockReadGuard<'_, Option<Box<dyn Buffer>>> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_write(&self) -> RwLockWriteGuard<'_, Option<Box<dyn Buffer>>> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Shared read guard over a tensor's buffer, starting at the view's
/// linear offset.
pub struct TensorData<'a> {
    guard: RwLockReadGuard<'a, Option<Box<dyn Buffer>>>,
    start: usize,
}

impl Deref for TensorData<'_> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        let buffer = self.guard.as_deref().unwrap();
        &buffer.as_slice()[self.start..]
    }
}

/// Exclusive write guard over a tensor's buffer, starting at the view's
/// linear offset.
pub struct TensorDataMut<'a> {
    guard: RwLockWriteGuard<'a, Option<Box<dyn Buffer>>>,
    start: usize,
}

impl Deref for TensorDataMut<'_> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        let buffer = self.guard.as_deref().unwrap();
        &buffer.as_slice()[self.start..]
    }
}

impl DerefMut for TensorDataMut<'_> {
    fn deref_mut(&mut self) -> &mut [f32] {
        let start = self.start;
        let buffer = self.guard.as_deref_mut().unwrap();
        &mut buffer.as_mut_slice()[start..]
    }
}
