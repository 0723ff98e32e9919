//! Field layout of AlphaGamma descriptors.
//!
//! A descriptor sampled on `num_circles` concentric circles and `num_rays`
//! angular rays holds `num_circles + num_circles * num_rays` elements:
//!
//! ```text
//! | alpha (C) | beta (R) | gamma (C*R - R) |
//!             |<----- beta+gamma (C*R) --->|
//! ```
//!
//! Element `i` of an unpacked descriptor and bit `i` of a packed descriptor
//! refer to the same comparison unit, so field ranges are shared by both
//! encodings. Only the offset of the extended (confidence) block differs:
//! `descriptor_size` elements when unpacked, `packed_byte_size` bytes when
//! packed.

use crate::util::{AlphaGammaError, AlphaGammaResult};

/// Storage encoding of a descriptor row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One boolean-valued byte per element.
    Unpacked,
    /// Eight elements per byte, least-significant bit first.
    Packed,
}

/// Base descriptors or descriptors with an appended confidence block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Base,
    Extended,
}

/// Named descriptor field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Alpha,
    Beta,
    Gamma,
}

/// Half-open range of elements (or bits) `[start, start + len)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldRange {
    pub start: usize,
    pub len: usize,
}

impl FieldRange {
    /// Exclusive end of the range.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns the range as a `std::ops::Range`.
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Validated circle/ray configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DescriptorLayout {
    num_circles: usize,
    num_rays: usize,
    descriptor_size: usize,
}

impl DescriptorLayout {
    /// Creates a layout; both counts must be at least one.
    pub fn new(num_circles: usize, num_rays: usize) -> AlphaGammaResult<Self> {
        let invalid = || AlphaGammaError::InvalidLayout {
            num_circles: i64::try_from(num_circles).unwrap_or(i64::MAX),
            num_rays: i64::try_from(num_rays).unwrap_or(i64::MAX),
        };
        if num_circles == 0 || num_rays == 0 {
            return Err(invalid());
        }
        let descriptor_size = num_circles
            .checked_mul(num_rays)
            .and_then(|v| v.checked_add(num_circles))
            .ok_or_else(invalid)?;
        // Extended rows hold twice the base size.
        descriptor_size.checked_mul(2).ok_or_else(invalid)?;
        Ok(Self {
            num_circles,
            num_rays,
            descriptor_size,
        })
    }

    /// Creates a layout from signed host scalars, rejecting non-positive values.
    pub fn from_signed(num_circles: i64, num_rays: i64) -> AlphaGammaResult<Self> {
        let invalid = AlphaGammaError::InvalidLayout {
            num_circles,
            num_rays,
        };
        if num_circles <= 0 || num_rays <= 0 {
            return Err(invalid);
        }
        let circles = usize::try_from(num_circles).map_err(|_| invalid.clone())?;
        let rays = usize::try_from(num_rays).map_err(|_| invalid.clone())?;
        Self::new(circles, rays)
    }

    pub fn num_circles(&self) -> usize {
        self.num_circles
    }

    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    /// Number of elements (bits) in a base descriptor.
    pub fn descriptor_size(&self) -> usize {
        self.descriptor_size
    }

    /// Number of bytes in a packed base descriptor.
    pub fn packed_byte_size(&self) -> usize {
        self.descriptor_size.div_ceil(8)
    }

    /// Returns the range covered by `field`.
    pub fn field(&self, field: Field) -> FieldRange {
        let c = self.num_circles;
        let r = self.num_rays;
        match field {
            Field::Alpha => FieldRange { start: 0, len: c },
            Field::Beta => FieldRange { start: c, len: r },
            Field::Gamma => FieldRange {
                start: c + r,
                len: c * r - r,
            },
        }
    }

    /// Beta and gamma treated as one field.
    pub fn beta_gamma(&self) -> FieldRange {
        FieldRange {
            start: self.num_circles,
            len: self.num_circles * self.num_rays,
        }
    }

    /// Length of a descriptor row in storage units (bytes) for `encoding`.
    pub fn row_len(&self, encoding: Encoding, variant: Variant) -> usize {
        let base = match encoding {
            Encoding::Unpacked => self.descriptor_size,
            Encoding::Packed => self.packed_byte_size(),
        };
        match variant {
            Variant::Base => base,
            Variant::Extended => 2 * base,
        }
    }

    /// Offset of the extended block, in elements for unpacked rows and in
    /// bytes for packed rows.
    pub fn extended_offset(&self, encoding: Encoding) -> usize {
        self.row_len(encoding, Variant::Base)
    }

    /// Infers the variant from a row length.
    pub fn detect_variant(&self, row_len: usize, encoding: Encoding) -> AlphaGammaResult<Variant> {
        let base = self.row_len(encoding, Variant::Base);
        let extended = self.row_len(encoding, Variant::Extended);
        if row_len == base {
            Ok(Variant::Base)
        } else if row_len == extended {
            Ok(Variant::Extended)
        } else {
            Err(AlphaGammaError::DescriptorSizeMismatch {
                got: row_len,
                base,
                extended,
            })
        }
    }
}

/// Number of elements in a base descriptor.
pub fn descriptor_size(num_circles: usize, num_rays: usize) -> AlphaGammaResult<usize> {
    Ok(DescriptorLayout::new(num_circles, num_rays)?.descriptor_size())
}

/// Number of bytes in a packed base descriptor.
pub fn packed_byte_size(num_circles: usize, num_rays: usize) -> AlphaGammaResult<usize> {
    Ok(DescriptorLayout::new(num_circles, num_rays)?.packed_byte_size())
}
