//! Conversion between byte-per-element and packed bitstring descriptors.
//!
//! Packed bitstrings store element `i` in bit `i % 8` of byte `i / 8`. The
//! packed kernels read the same buffers as little-endian 64-bit words, which
//! keeps bit `i` of word `k` equal to element `64 * k + i`.

use crate::descriptor::{DescriptorSet, OwnedDescriptorSet};
use crate::layout::{DescriptorLayout, Encoding, Variant};
use crate::util::{AlphaGammaError, AlphaGammaResult};

pub mod span;

pub use span::{BitSpan, Chunk, MaskedByte};

/// Packs boolean-valued bytes into an LSB-first bitstring of `ceil(n / 8)` bytes.
///
/// Any non-zero input byte is treated as `true`.
pub fn pack_bits(elements: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; elements.len().div_ceil(8)];
    pack_bits_into(elements, &mut out);
    out
}

/// Packs `elements` into the front of `out`, which must hold `ceil(n / 8)` bytes.
fn pack_bits_into(elements: &[u8], out: &mut [u8]) {
    for (byte, chunk) in out.iter_mut().zip(elements.chunks(8)) {
        *byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &value)| acc | (u8::from(value != 0) << bit));
    }
}

/// Expands the first `len` bits of `packed` into 0/1 bytes.
pub fn unpack_bits(packed: &[u8], len: usize) -> AlphaGammaResult<Vec<u8>> {
    let available = packed.len() * 8;
    if len > available {
        return Err(AlphaGammaError::BitRangeOutOfBounds {
            offset: 0,
            len,
            available,
        });
    }
    Ok((0..len).map(|i| (packed[i / 8] >> (i % 8)) & 1).collect())
}

/// Orientation of a host vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// A 1×N vector.
    Row,
    /// An N×1 vector.
    Column,
}

impl Orientation {
    /// Infers the orientation of a `rows × cols` vector.
    ///
    /// A single-row shape is a row vector; any other vector is a column. Shapes
    /// with more than one row and column are not vectors.
    pub fn from_shape(rows: usize, cols: usize) -> AlphaGammaResult<Self> {
        if rows == 1 {
            Ok(Self::Row)
        } else if cols == 1 {
            Ok(Self::Column)
        } else {
            Err(AlphaGammaError::InvalidDimensions { rows, cols })
        }
    }

    /// Shape of a vector with `len` elements in this orientation.
    pub fn shape(self, len: usize) -> (usize, usize) {
        match self {
            Self::Row => (1, len),
            Self::Column => (len, 1),
        }
    }
}

/// Packed bitstring that remembers the orientation of its source vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedBits {
    bytes: Vec<u8>,
    bit_len: usize,
    orientation: Orientation,
}

impl PackedBits {
    /// Packs a boolean-valued vector, keeping its orientation.
    pub fn pack(elements: &[u8], orientation: Orientation) -> Self {
        Self {
            bytes: pack_bits(elements),
            bit_len: elements.len(),
            orientation,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of packed elements.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Output shape in the source orientation.
    pub fn shape(&self) -> (usize, usize) {
        self.orientation.shape(self.bytes.len())
    }

    /// Restores the 0/1 byte vector.
    pub fn unpack(&self) -> AlphaGammaResult<Vec<u8>> {
        unpack_bits(&self.bytes, self.bit_len)
    }
}

/// Packs one unpacked descriptor for `layout`.
///
/// Extended descriptors are packed half by half so that the confidence block
/// starts at byte `packed_byte_size`, not at bit `descriptor_size`.
pub fn pack_descriptor(desc: &[u8], layout: &DescriptorLayout) -> AlphaGammaResult<Vec<u8>> {
    let variant = layout.detect_variant(desc.len(), Encoding::Unpacked)?;
    let mut out = vec![0u8; layout.row_len(Encoding::Packed, variant)];
    pack_descriptor_into(desc, layout, variant, &mut out);
    Ok(out)
}

fn pack_descriptor_into(desc: &[u8], layout: &DescriptorLayout, variant: Variant, out: &mut [u8]) {
    let size = layout.descriptor_size();
    let packed = layout.packed_byte_size();
    pack_bits_into(&desc[..size], &mut out[..packed]);
    if variant == Variant::Extended {
        pack_bits_into(&desc[size..], &mut out[packed..]);
    }
}

/// Packs every descriptor of an unpacked collection.
pub fn pack_descriptor_set(
    set: DescriptorSet<'_>,
    layout: &DescriptorLayout,
) -> AlphaGammaResult<OwnedDescriptorSet> {
    let variant = layout.detect_variant(set.rows(), Encoding::Unpacked)?;
    let rows = layout.row_len(Encoding::Packed, variant);
    let mut data = vec![0u8; rows * set.cols()];
    for (desc, out) in set.iter().zip(data.chunks_exact_mut(rows)) {
        pack_descriptor_into(desc, layout, variant, out);
    }
    OwnedDescriptorSet::new(data, rows, set.cols())
}
