//! Whole-tensor snapshot dumps.
//!
//! The format is a headerless concatenation of each tensor's elements
//! in declaration order, little-endian, with no length prefix or type
//! tag. A loader must know the exact ordered list of tensor shapes a
//! priori; any total-length mismatch is rejected.

use crate::error::{Error, Result};
use crate::tensor::Tensor;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const ELEM_BYTES: usize = std::mem::size_of::<f32>();

pub fn save<W: Write>(writer: &mut W, tensors: &[Tensor]) -> Result<()> {
    for tensor in tensors {
        if !tensor.has_data() {
            return Err(Error::Unallocated);
        }
        // The dump is a flat element run; a strided view would emit the
        // wrong bytes.
        assert!(
            tensor.is_contiguous(),
            "cannot snapshot a non-contiguous view"
        );
        let data = tensor.data();
        let count = tensor.size().count();
        let mut bytes = Vec::with_capacity(count * ELEM_BYTES);
        for value in &data[..count] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        writer.write_all(&bytes)?;
    }
    Ok(())
}

pub fn save_to_path<P: AsRef<Path>>(path: P, tensors: &[Tensor]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save(&mut writer, tensors)?;
    writer.flush()?;
    Ok(())
}

pub fn load<R: Read>(reader: &mut R, tensors: &[Tensor]) -> Result<()> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let expected: usize = tensors.iter().map(|t| t.size().count() * ELEM_BYTES).sum();
    if bytes.len() != expected {
        return Err(Error::SnapshotSizeMismatch {
            expected: expected as u64,
            got: bytes.len() as u64,
        });
    }
    let mut at = 0;
    for tensor in tensors {
        let count = tensor.size().count();
        let mut data = tensor.mutable_data();
        for (i, chunk) in bytes[at..at + count * ELEM_BYTES].chunks_exact(ELEM_BYTES).enumerate() {
            data[i] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        at += count * ELEM_BYTES;
    }
    Ok(())
}

pub fn load_from_path<P: AsRef<Path>>(path: P, tensors: &[Tensor]) -> Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    load(&mut reader, tensors)
}
