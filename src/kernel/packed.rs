//! Popcount kernel over packed bitstring descriptors.
//!
//! Differences over a field are counted chunk by chunk (see
//! [`BitSpan`](crate::bits::BitSpan)): full 64-bit words use `XOR` and
//! `count_ones` directly, and the partial bytes at field edges are masked
//! before counting. The extended form reads the confidence bit-planes at a
//! fixed byte offset and accumulates
//! `popcount(a ^ b) + popcount(ae ^ be) + 2 * popcount(ae & be & (a ^ b))`.

use crate::bits::span::load_word;
use crate::bits::{BitSpan, Chunk, MaskedByte};
use crate::kernel::{DistancePlan, FieldTerm, FieldWeighting, Kernel};
use crate::layout::{Encoding, Variant};
use crate::util::{AlphaGammaError, AlphaGammaResult};

/// Packed popcount kernel.
pub struct PackedKernel;

#[inline]
pub(crate) fn hamming_word(a: u64, b: u64) -> u64 {
    u64::from((a ^ b).count_ones())
}

#[inline]
pub(crate) fn extended_word(a: u64, b: u64, a_e: u64, b_e: u64) -> u64 {
    let ab = a ^ b;
    u64::from(ab.count_ones())
        + u64::from((a_e ^ b_e).count_ones())
        + 2 * u64::from((a_e & b_e & ab).count_ones())
}

#[inline]
pub(crate) fn hamming_byte(desc1: &[u8], desc2: &[u8], byte: MaskedByte) -> u64 {
    let MaskedByte { index, mask } = byte;
    u64::from(((desc1[index] ^ desc2[index]) & mask).count_ones())
}

#[inline]
pub(crate) fn extended_byte(desc1: &[u8], desc2: &[u8], byte: MaskedByte, ext: usize) -> u64 {
    let MaskedByte { index, mask } = byte;
    extended_word(
        u64::from(desc1[index] & mask),
        u64::from(desc2[index] & mask),
        u64::from(desc1[index + ext] & mask),
        u64::from(desc2[index + ext] & mask),
    )
}

/// Counts differing bits over a span without bounds checks beyond slicing.
pub(crate) fn hamming_span(desc1: &[u8], desc2: &[u8], span: &BitSpan) -> u64 {
    span.chunks()
        .map(|chunk| match chunk {
            Chunk::Byte(byte) => hamming_byte(desc1, desc2, byte),
            Chunk::Word(pos) => hamming_word(load_word(desc1, pos), load_word(desc2, pos)),
        })
        .sum()
}

/// Extended distance over a span with the confidence block `ext` bytes later.
pub(crate) fn extended_span(desc1: &[u8], desc2: &[u8], span: &BitSpan, ext: usize) -> u64 {
    span.chunks()
        .map(|chunk| match chunk {
            Chunk::Byte(byte) => extended_byte(desc1, desc2, byte, ext),
            Chunk::Word(pos) => extended_word(
                load_word(desc1, pos),
                load_word(desc2, pos),
                load_word(desc1, pos + ext),
                load_word(desc2, pos + ext),
            ),
        })
        .sum()
}

fn check_operands(desc1: &[u8], desc2: &[u8]) -> AlphaGammaResult<()> {
    if desc1.len() != desc2.len() {
        return Err(AlphaGammaError::DescriptorLengthMismatch {
            left: desc1.len(),
            right: desc2.len(),
        });
    }
    Ok(())
}

/// Number of differing bits in `[bit_offset, bit_offset + bit_length)`.
pub fn hamming_distance(
    desc1: &[u8],
    desc2: &[u8],
    bit_offset: usize,
    bit_length: usize,
) -> AlphaGammaResult<u64> {
    check_operands(desc1, desc2)?;
    let span = BitSpan::checked(bit_offset, bit_length, desc1.len())?;
    Ok(hamming_span(desc1, desc2, &span))
}

/// Extended distance in `[bit_offset, bit_offset + bit_length)`, with the
/// confidence bits `extended_byte_offset` bytes after the base bits.
pub fn extended_hamming_distance(
    desc1: &[u8],
    desc2: &[u8],
    bit_offset: usize,
    bit_length: usize,
    extended_byte_offset: usize,
) -> AlphaGammaResult<u64> {
    check_operands(desc1, desc2)?;
    let span = BitSpan::checked(bit_offset, bit_length, desc1.len())?;
    let fits = span
        .end_byte()
        .checked_add(extended_byte_offset)
        .is_some_and(|end| end <= desc1.len());
    if !fits {
        return Err(AlphaGammaError::BitRangeOutOfBounds {
            offset: extended_byte_offset
                .saturating_mul(8)
                .saturating_add(bit_offset),
            len: bit_length,
            available: desc1.len().saturating_mul(8),
        });
    }
    Ok(extended_span(desc1, desc2, &span, extended_byte_offset))
}

impl Kernel for PackedKernel {
    const ENCODING: Encoding = Encoding::Packed;
    const WEIGHTING: FieldWeighting = FieldWeighting::Merged;

    fn field_distance(plan: &DistancePlan, desc1: &[u8], desc2: &[u8], term: &FieldTerm) -> u64 {
        match plan.variant() {
            Variant::Base => hamming_span(desc1, desc2, term.span()),
            Variant::Extended => extended_span(desc1, desc2, term.span(), plan.extended_offset()),
        }
    }
}
