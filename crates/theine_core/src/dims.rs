#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Shape of a 4-D tensor in (num, channels, height, width) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub num: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Size {
    pub const fn new(num: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            num,
            channels,
            height,
            width,
        }
    }

    /// Total element count.
    pub const fn count(&self) -> usize {
        self.num * self.channels * self.height * self.width
    }
}

/// Per-dimension offset of a view into a larger buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset {
    pub num: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Offset {
    pub const fn new(num: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            num,
            channels,
            height,
            width,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Position in the flat buffer: the dot product of per-dimension
    /// offsets and strides.
    pub const fn linear(&self, stride: &Stride) -> usize {
        self.num * stride.num
            + self.channels * stride.channels
            + self.height * stride.height
            + self.width * stride.width
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(
            self.num + rhs.num,
            self.channels + rhs.channels,
            self.height + rhs.height,
            self.width + rhs.width,
        )
    }
}

impl AddAssign for Offset {
    fn add_assign(&mut self, rhs: Offset) {
        *self = *self + rhs;
    }
}

/// Per-dimension element stride of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stride {
    pub num: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Stride {
    pub const fn new(num: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            num,
            channels,
            height,
            width,
        }
    }
}

impl From<Size> for Stride {
    /// Row-major contiguous packing: num-major, then channel, height,
    /// width.
    fn from(size: Size) -> Self {
        Stride {
            num: size.channels * size.height * size.width,
            channels: size.height * size.width,
            height: size.width,
            width: 1,
        }
    }
}
