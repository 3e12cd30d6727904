//! Persisted binary layout of a [`Csr`] container.
//!
//! ```text
//! row_offsets   (head_extent + 1) x u64 LE   "break"
//! col_ids[0]    nnz x u64 LE                 "break"
//! ...
//! col_ids[n-1]  nnz x u64 LE                 "break"
//! values        nnz x f64 LE                 "break"
//! ```
//!
//! Extents are not part of the stream; the reader supplies them.

use std::io::{Read, Write};

use log::debug;

use super::Csr;
use super::csr::check_row_offsets;
use crate::error::TensorError;

/// Literal token written after every block.
pub const CSR_BLOCK_SEPARATOR: &[u8] = b"break";

impl Csr {
    /// Dump the container in the persisted layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), TensorError> {
        write_usizes(writer, self.row_offsets())?;
        for axis in 0..self.tail_shape().len() {
            write_usizes(writer, self.col_ids(axis))?;
        }
        for &value in self.values() {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.write_all(CSR_BLOCK_SEPARATOR)?;
        debug!(
            "wrote CSR {}x{:?} with {} nonzeros",
            self.head_extent(),
            self.tail_shape(),
            self.nnz()
        );
        Ok(())
    }

    /// Load a container written by [`Csr::write_to`].
    pub fn read_from<R: Read>(
        reader: &mut R,
        head_extent: usize,
        tail_shape: &[usize],
    ) -> Result<Self, TensorError> {
        let row_offsets = read_usizes(reader, head_extent + 1)?;
        // Untrusted nnz: buffers grow only with the data actually read.
        let nnz = check_row_offsets(head_extent, &row_offsets)?;
        let mut col_ids = Vec::with_capacity(tail_shape.len());
        for _ in tail_shape {
            col_ids.push(read_usizes(reader, nnz)?);
        }
        let mut values = Vec::new();
        let mut buf = [0u8; 8];
        for _ in 0..nnz {
            reader.read_exact(&mut buf)?;
            values.push(f64::from_le_bytes(buf));
        }
        expect_separator(reader)?;
        Self::from_parts(head_extent, tail_shape, row_offsets, col_ids, values)
    }
}

fn write_usizes<W: Write>(writer: &mut W, data: &[usize]) -> Result<(), TensorError> {
    for &x in data {
        writer.write_all(&(x as u64).to_le_bytes())?;
    }
    writer.write_all(CSR_BLOCK_SEPARATOR)?;
    Ok(())
}

fn read_usizes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<usize>, TensorError> {
    let mut out = Vec::new();
    let mut buf = [0u8; 8];
    for _ in 0..len {
        reader.read_exact(&mut buf)?;
        let value = u64::from_le_bytes(buf);
        out.push(
            usize::try_from(value).map_err(|_| TensorError::CorruptCsrStream {
                message: format!("integer {value} does not fit in usize"),
            })?,
        );
    }
    expect_separator(reader)?;
    Ok(out)
}

fn expect_separator<R: Read>(reader: &mut R) -> Result<(), TensorError> {
    let mut token = [0u8; CSR_BLOCK_SEPARATOR.len()];
    reader.read_exact(&mut token)?;
    if token.as_slice() != CSR_BLOCK_SEPARATOR {
        return Err(TensorError::CorruptCsrStream {
            message: format!("expected block separator, found {:?}", token),
        });
    }
    Ok(())
}
