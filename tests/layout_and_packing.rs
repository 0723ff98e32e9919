use alphagamma::{
    descriptor_size, pack_bits, pack_descriptor, pack_descriptor_set, packed_byte_size,
    unpack_bits, AlphaGammaError, DescriptorLayout, DescriptorSet, Encoding, Field, FieldRange,
    Variant,
};

#[test]
fn four_circles_six_rays_sizes() {
    assert_eq!(descriptor_size(4, 6).unwrap(), 28);
    assert_eq!(packed_byte_size(4, 6).unwrap(), 4);

    let layout = DescriptorLayout::new(4, 6).unwrap();
    assert_eq!(layout.field(Field::Alpha), FieldRange { start: 0, len: 4 });
    assert_eq!(layout.field(Field::Beta), FieldRange { start: 4, len: 6 });
    assert_eq!(layout.field(Field::Gamma), FieldRange { start: 10, len: 18 });
    assert_eq!(layout.beta_gamma(), FieldRange { start: 4, len: 24 });
}

#[test]
fn minimal_layout_is_valid() {
    let layout = DescriptorLayout::new(1, 1).unwrap();
    assert_eq!(layout.descriptor_size(), 2);
    assert_eq!(layout.packed_byte_size(), 1);
    assert_eq!(layout.field(Field::Gamma).len, 0);
}

#[test]
fn zero_counts_are_rejected() {
    let err = DescriptorLayout::new(0, 6).unwrap_err();
    assert_eq!(
        err,
        AlphaGammaError::InvalidLayout {
            num_circles: 0,
            num_rays: 6,
        }
    );
    assert!(descriptor_size(4, 0).is_err());
    assert!(packed_byte_size(0, 0).is_err());
}

#[test]
fn detect_variant_by_row_length() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    assert_eq!(
        layout.detect_variant(28, Encoding::Unpacked).unwrap(),
        Variant::Base
    );
    assert_eq!(
        layout.detect_variant(56, Encoding::Unpacked).unwrap(),
        Variant::Extended
    );
    assert_eq!(
        layout.detect_variant(4, Encoding::Packed).unwrap(),
        Variant::Base
    );
    assert_eq!(
        layout.detect_variant(8, Encoding::Packed).unwrap(),
        Variant::Extended
    );

    let err = layout.detect_variant(29, Encoding::Unpacked).unwrap_err();
    assert_eq!(
        err,
        AlphaGammaError::DescriptorSizeMismatch {
            got: 29,
            base: 28,
            extended: 56,
        }
    );
}

#[test]
fn packed_length_is_ceil_of_bits() {
    for n in 0..70usize {
        let elements = vec![1u8; n];
        let packed = pack_bits(&elements);
        assert_eq!(packed.len(), n.div_ceil(8));
        assert_eq!(unpack_bits(&packed, n).unwrap(), elements);
    }
}

#[test]
fn pack_matches_bit_rule() {
    let elements: Vec<u8> = (0..37u32).map(|i| ((i * i + 3) % 5 < 2) as u8).collect();
    let packed = pack_bits(&elements);
    for (i, &value) in elements.iter().enumerate() {
        let bit = (packed[i / 8] >> (i % 8)) & 1;
        assert_eq!(bit, value, "element {i}");
    }
}

#[test]
fn extended_descriptors_pack_per_block() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let mut desc = vec![0u8; 56];
    desc[27] = 1; // last base element
    desc[28] = 1; // first confidence element
    let packed = pack_descriptor(&desc, &layout).unwrap();
    assert_eq!(packed.len(), 8);
    assert_eq!(packed[3], 0b0000_1000);
    assert_eq!(packed[4], 0b0000_0001);
    assert_eq!(&packed[..3], &[0, 0, 0]);
    assert_eq!(&packed[5..], &[0, 0, 0]);
}

#[test]
fn pack_descriptor_set_packs_every_column() {
    let layout = DescriptorLayout::new(2, 3).unwrap();
    // Two base descriptors of 8 elements: all zeros and all ones.
    let mut data = vec![0u8; 8];
    data.extend_from_slice(&[1u8; 8]);
    let set = DescriptorSet::new(&data, 8, 2).unwrap();
    let packed = pack_descriptor_set(set, &layout).unwrap();
    assert_eq!(packed.rows(), 1);
    assert_eq!(packed.cols(), 2);
    assert_eq!(packed.data(), &[0x00, 0xFF]);

    let bad = DescriptorSet::new(&data, 4, 4).unwrap();
    assert!(pack_descriptor_set(bad, &layout).is_err());
}
