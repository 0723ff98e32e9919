//! Decomposition of an arbitrary bit range into byte and word chunks.
//!
//! A range `[offset, offset + len)` over a packed bitstring splits into:
//!
//! 1. a leading partial byte when `offset` is not a multiple of 8,
//! 2. a run of full 64-bit words starting at the first whole byte,
//! 3. full trailing bytes that do not fill a word,
//! 4. a trailing partial byte.
//!
//! Descriptor fields rarely start or end on a byte boundary, so phases 1 and
//! 4 occur at nearly every field edge while phase 2 carries the bulk of the
//! bits for realistic descriptor sizes.

use std::ops::Range;

use crate::util::{AlphaGammaError, AlphaGammaResult};

/// A byte index together with the bits of that byte covered by a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskedByte {
    pub index: usize,
    pub mask: u8,
}

/// One unit of work over a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// Selected bits of a single byte.
    Byte(MaskedByte),
    /// Eight full bytes starting at the given byte index, read little-endian.
    Word(usize),
}

/// Precomputed chunk layout of a bit range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitSpan {
    offset: usize,
    len: usize,
    head: Option<MaskedByte>,
    word_start: usize,
    word_count: usize,
    bytes: Range<usize>,
    tail: Option<MaskedByte>,
}

impl BitSpan {
    /// Splits `[offset, offset + len)` into chunks.
    pub fn new(offset: usize, len: usize) -> Self {
        let mut byte_pos = offset / 8;
        let shift = offset % 8;
        let mut remaining = len;

        let mut head = None;
        if shift != 0 && remaining > 0 {
            let take = (8 - shift).min(remaining);
            head = Some(MaskedByte {
                index: byte_pos,
                mask: low_mask(take) << shift,
            });
            remaining -= take;
            byte_pos += 1;
        }

        let word_start = byte_pos;
        let word_count = remaining / 64;
        byte_pos += word_count * 8;
        remaining %= 64;

        let byte_count = remaining / 8;
        let bytes = byte_pos..byte_pos + byte_count;
        byte_pos += byte_count;
        remaining %= 8;

        let tail = (remaining > 0).then(|| MaskedByte {
            index: byte_pos,
            mask: low_mask(remaining),
        });

        Self {
            offset,
            len,
            head,
            word_start,
            word_count,
            bytes,
            tail,
        }
    }

    /// Splits the range after checking that it fits in `buffer_len` bytes.
    pub fn checked(offset: usize, len: usize, buffer_len: usize) -> AlphaGammaResult<Self> {
        let available = buffer_len.saturating_mul(8);
        let end = offset
            .checked_add(len)
            .ok_or(AlphaGammaError::BitRangeOutOfBounds {
                offset,
                len,
                available,
            })?;
        if end > available {
            return Err(AlphaGammaError::BitRangeOutOfBounds {
                offset,
                len,
                available,
            });
        }
        Ok(Self::new(offset, len))
    }

    /// First bit of the range.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bits in the range.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes a buffer needs to cover the whole range.
    ///
    /// Saturates for spans reaching past `usize::MAX` bits; such spans never
    /// pass [`BitSpan::checked`].
    pub fn end_byte(&self) -> usize {
        self.offset.saturating_add(self.len).div_ceil(8)
    }

    /// Leading partial byte.
    pub fn head(&self) -> Option<MaskedByte> {
        self.head
    }

    /// Byte index of the first full word and the number of full words.
    pub fn words(&self) -> (usize, usize) {
        (self.word_start, self.word_count)
    }

    /// Full bytes between the last word and the trailing partial byte.
    pub fn full_bytes(&self) -> Range<usize> {
        self.bytes.clone()
    }

    /// Trailing partial byte.
    pub fn tail(&self) -> Option<MaskedByte> {
        self.tail
    }

    /// Iterates over all chunks in address order.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        let words = (0..self.word_count).map(move |k| Chunk::Word(self.word_start + 8 * k));
        let bytes = self
            .bytes
            .clone()
            .map(|index| Chunk::Byte(MaskedByte { index, mask: 0xFF }));
        self.head
            .into_iter()
            .map(Chunk::Byte)
            .chain(words)
            .chain(bytes)
            .chain(self.tail.into_iter().map(Chunk::Byte))
    }
}

/// Mask of the lowest `bits` bits, `bits` in `1..=8`.
fn low_mask(bits: usize) -> u8 {
    (0xFFu16 >> (8 - bits)) as u8
}

/// Reads eight bytes at `pos` as a little-endian word.
#[inline]
pub(crate) fn load_word(buf: &[u8], pos: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[pos..pos + 8]);
    u64::from_le_bytes(word)
}
