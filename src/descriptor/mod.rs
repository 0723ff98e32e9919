//! Descriptor collections.
//!
//! `DescriptorSet` is a borrowed column-major view: each descriptor is one
//! contiguous column of `rows` bytes, and the collection holds `cols`
//! descriptors. This is the layout a host numeric environment hands over for a
//! D×N matrix stored column by column.

use crate::util::{AlphaGammaError, AlphaGammaResult};

/// Borrowed collection of equally sized descriptors.
#[derive(Copy, Clone, Debug)]
pub struct DescriptorSet<'a> {
    data: &'a [u8],
    rows: usize,
    cols: usize,
}

impl<'a> DescriptorSet<'a> {
    /// Creates a view over `cols` descriptors of `rows` bytes each.
    ///
    /// An empty collection (`cols == 0`) is allowed; descriptors themselves
    /// must be non-empty.
    pub fn new(data: &'a [u8], rows: usize, cols: usize) -> AlphaGammaResult<Self> {
        if rows == 0 {
            return Err(AlphaGammaError::InvalidDimensions { rows, cols });
        }
        let needed = rows
            .checked_mul(cols)
            .ok_or(AlphaGammaError::InvalidDimensions { rows, cols })?;
        if data.len() < needed {
            return Err(AlphaGammaError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data: &data[..needed],
            rows,
            cols,
        })
    }

    /// Creates a single-descriptor collection.
    pub fn single(desc: &'a [u8]) -> AlphaGammaResult<Self> {
        Self::new(desc, desc.len(), 1)
    }

    /// Bytes per descriptor.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of descriptors.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0
    }

    /// Returns the backing slice, descriptor after descriptor.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns descriptor `idx` if it exists.
    pub fn get(&self, idx: usize) -> Option<&'a [u8]> {
        if idx >= self.cols {
            return None;
        }
        let start = idx * self.rows;
        self.data.get(start..start + self.rows)
    }

    /// Iterates over the descriptors in column order.
    pub fn iter(&self) -> std::slice::ChunksExact<'a, u8> {
        self.data.chunks_exact(self.rows)
    }
}

/// Owned collection of descriptors in column-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedDescriptorSet {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl OwnedDescriptorSet {
    /// Wraps a buffer of exactly `rows * cols` bytes.
    pub fn new(data: Vec<u8>, rows: usize, cols: usize) -> AlphaGammaResult<Self> {
        DescriptorSet::new(&data, rows, cols)?;
        if data.len() != rows * cols {
            return Err(AlphaGammaError::DescriptorLengthMismatch {
                left: data.len(),
                right: rows * cols,
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a collection from individual descriptors of equal length.
    pub fn from_descriptors<I, D>(descriptors: I) -> AlphaGammaResult<Self>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        let mut data = Vec::new();
        let mut rows = None;
        let mut cols = 0usize;
        for desc in descriptors {
            let desc = desc.as_ref();
            match rows {
                None => rows = Some(desc.len()),
                Some(r) if r != desc.len() => {
                    return Err(AlphaGammaError::DescriptorLengthMismatch {
                        left: r,
                        right: desc.len(),
                    });
                }
                Some(_) => {}
            }
            data.extend_from_slice(desc);
            cols += 1;
        }
        let rows = rows.ok_or(AlphaGammaError::InvalidInput("empty descriptor collection"))?;
        Self::new(data, rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the collection.
    pub fn view(&self) -> DescriptorSet<'_> {
        DescriptorSet {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }
}
