//! SIMD-accelerated packed kernel using the `wide` crate.
//!
//! The word phase of each field is processed four 64-bit words at a time with
//! `u64x4` for the XOR/AND combination; lane popcounts are summed per block.
//! Edge bytes and leftover words reuse the scalar packed helpers, so the
//! result is identical to [`PackedKernel`](crate::kernel::packed::PackedKernel).

use crate::bits::span::load_word;
use crate::bits::{BitSpan, MaskedByte};
use crate::kernel::packed::{extended_byte, extended_word, hamming_byte, hamming_word};
use crate::kernel::{DistancePlan, FieldTerm, FieldWeighting, Kernel};
use crate::layout::{Encoding, Variant};
use wide::u64x4;

const LANES: usize = 4;
const BLOCK_BYTES: usize = LANES * 8;

/// Load four consecutive little-endian words into a `u64x4`.
#[inline]
fn load_u64x4(buf: &[u8], pos: usize) -> u64x4 {
    u64x4::from([
        load_word(buf, pos),
        load_word(buf, pos + 8),
        load_word(buf, pos + 16),
        load_word(buf, pos + 24),
    ])
}

/// Sum of lane popcounts.
#[inline]
fn popcount(v: u64x4) -> u64 {
    v.to_array()
        .iter()
        .map(|lane| u64::from(lane.count_ones()))
        .sum()
}

/// SIMD-accelerated packed popcount kernel.
pub struct PackedSimdKernel;

impl PackedSimdKernel {
    fn hamming(desc1: &[u8], desc2: &[u8], span: &BitSpan) -> u64 {
        let mut total = 0u64;
        if let Some(head) = span.head() {
            total += hamming_byte(desc1, desc2, head);
        }

        let (start, count) = span.words();
        let blocks = count / LANES;
        for blk in 0..blocks {
            let pos = start + blk * BLOCK_BYTES;
            total += popcount(load_u64x4(desc1, pos) ^ load_u64x4(desc2, pos));
        }
        for k in blocks * LANES..count {
            let pos = start + 8 * k;
            total += hamming_word(load_word(desc1, pos), load_word(desc2, pos));
        }

        for index in span.full_bytes() {
            total += u64::from((desc1[index] ^ desc2[index]).count_ones());
        }
        if let Some(tail) = span.tail() {
            total += hamming_byte(desc1, desc2, tail);
        }
        total
    }

    fn extended(desc1: &[u8], desc2: &[u8], span: &BitSpan, ext: usize) -> u64 {
        let mut total = 0u64;
        if let Some(head) = span.head() {
            total += extended_byte(desc1, desc2, head, ext);
        }

        let (start, count) = span.words();
        let blocks = count / LANES;
        for blk in 0..blocks {
            let pos = start + blk * BLOCK_BYTES;
            let a = load_u64x4(desc1, pos);
            let b = load_u64x4(desc2, pos);
            let a_e = load_u64x4(desc1, pos + ext);
            let b_e = load_u64x4(desc2, pos + ext);
            let ab = a ^ b;
            total += popcount(ab) + popcount(a_e ^ b_e) + 2 * popcount(a_e & b_e & ab);
        }
        for k in blocks * LANES..count {
            let pos = start + 8 * k;
            total += extended_word(
                load_word(desc1, pos),
                load_word(desc2, pos),
                load_word(desc1, pos + ext),
                load_word(desc2, pos + ext),
            );
        }

        for index in span.full_bytes() {
            let byte = MaskedByte { index, mask: 0xFF };
            total += extended_byte(desc1, desc2, byte, ext);
        }
        if let Some(tail) = span.tail() {
            total += extended_byte(desc1, desc2, tail, ext);
        }
        total
    }
}

impl Kernel for PackedSimdKernel {
    const ENCODING: Encoding = Encoding::Packed;
    const WEIGHTING: FieldWeighting = FieldWeighting::Merged;

    fn field_distance(plan: &DistancePlan, desc1: &[u8], desc2: &[u8], term: &FieldTerm) -> u64 {
        match plan.variant() {
            Variant::Base => Self::hamming(desc1, desc2, term.span()),
            Variant::Extended => Self::extended(desc1, desc2, term.span(), plan.extended_offset()),
        }
    }
}
