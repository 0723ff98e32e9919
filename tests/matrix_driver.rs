use alphagamma::lowlevel::{compute_distances, DistancePlan, Kernel, PackedKernel, ReferenceKernel};
use alphagamma::{
    alpha_gamma_distances, alpha_gamma_distances_fast, pack_descriptor_set, AlphaGammaError,
    DescriptorLayout, DescriptorSet, DistanceConfig, DistanceEngine, FieldWeighting,
    OwnedDescriptorSet, Variant, Weights,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_set(rng: &mut StdRng, rows: usize, cols: usize) -> OwnedDescriptorSet {
    let data = (0..rows * cols)
        .map(|_| rng.random_bool(0.5) as u8)
        .collect();
    OwnedDescriptorSet::new(data, rows, cols).unwrap()
}

#[test]
fn matrix_entries_match_pairwise_kernel() {
    let mut rng = StdRng::seed_from_u64(10);
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let eng = DistanceEngine::new(layout);
    let set1 = random_set(&mut rng, 28, 7);
    let set2 = random_set(&mut rng, 28, 5);

    let matrix = eng.reference_distances(set1.view(), set2.view()).unwrap();
    assert_eq!((matrix.rows(), matrix.cols()), (5, 7));

    let plan = eng
        .plan_for::<ReferenceKernel>(set1.view(), set2.view())
        .unwrap();
    for i in 0..7 {
        for j in 0..5 {
            let d1 = set1.view().get(i).unwrap();
            let d2 = set2.view().get(j).unwrap();
            assert_eq!(
                matrix.get(j, i).unwrap(),
                ReferenceKernel::distance(&plan, d1, d2)
            );
        }
    }
}

#[test]
fn swapping_collections_transposes_the_matrix() {
    let mut rng = StdRng::seed_from_u64(11);
    let layout = DescriptorLayout::new(3, 8).unwrap();
    let eng = DistanceEngine::new(layout);
    let set1 = random_set(&mut rng, 2 * layout.descriptor_size(), 6);
    let set2 = random_set(&mut rng, 2 * layout.descriptor_size(), 4);

    let forward = eng.reference_distances(set1.view(), set2.view()).unwrap();
    let backward = eng.reference_distances(set2.view(), set1.view()).unwrap();
    assert_eq!(forward.transpose(), backward);

    let p1 = pack_descriptor_set(set1.view(), &layout).unwrap();
    let p2 = pack_descriptor_set(set2.view(), &layout).unwrap();
    let forward = eng.packed_distances(p1.view(), p2.view()).unwrap();
    let backward = eng.packed_distances(p2.view(), p1.view()).unwrap();
    assert_eq!(forward.transpose(), backward);
}

#[test]
fn packed_matrix_matches_pairwise_kernel() {
    let mut rng = StdRng::seed_from_u64(12);
    let layout = DescriptorLayout::new(10, 16).unwrap();
    let eng = DistanceEngine::new(layout);
    let set1 = random_set(&mut rng, layout.descriptor_size(), 9);
    let set2 = random_set(&mut rng, layout.descriptor_size(), 3);
    let p1 = pack_descriptor_set(set1.view(), &layout).unwrap();
    let p2 = pack_descriptor_set(set2.view(), &layout).unwrap();

    let matrix = eng.packed_distances(p1.view(), p2.view()).unwrap();
    let plan = eng.plan_for::<PackedKernel>(p1.view(), p2.view()).unwrap();
    for (i, d1) in p1.view().iter().enumerate() {
        for (j, d2) in p2.view().iter().enumerate() {
            assert_eq!(
                matrix.get(j, i).unwrap(),
                PackedKernel::distance(&plan, d1, d2)
            );
        }
    }
}

#[test]
fn minimal_layout_produces_one_by_one_matrices() {
    let desc1 = [1u8, 0];
    let desc2 = [0u8, 0];
    let set1 = DescriptorSet::new(&desc1, 2, 1).unwrap();
    let set2 = DescriptorSet::new(&desc2, 2, 1).unwrap();
    let m = alpha_gamma_distances(set1, set2, 1, 1, Weights::default()).unwrap();
    assert_eq!((m.rows(), m.cols()), (1, 1));
    assert_eq!(m.get(0, 0), Some(5.0));

    let packed1 = [0b01u8];
    let packed2 = [0b10u8];
    let set1 = DescriptorSet::new(&packed1, 1, 1).unwrap();
    let set2 = DescriptorSet::new(&packed2, 1, 1).unwrap();
    let m = alpha_gamma_distances_fast(set1, set2, 1, 1, Weights::default()).unwrap();
    assert_eq!(m.as_slice(), &[6.0]);
}

#[test]
fn empty_collections_give_empty_matrices() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let eng = DistanceEngine::new(layout);
    let data = vec![0u8; 28 * 3];
    let set = DescriptorSet::new(&data, 28, 3).unwrap();
    let empty = DescriptorSet::new(&[], 28, 0).unwrap();

    let m = eng.reference_distances(set, empty).unwrap();
    assert_eq!((m.rows(), m.cols()), (0, 3));
    let m = eng.reference_distances(empty, set).unwrap();
    assert_eq!((m.rows(), m.cols()), (3, 0));
    assert!(m.as_slice().is_empty());
}

#[test]
fn mismatched_row_counts_fail_before_computing() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let eng = DistanceEngine::new(layout);
    let base = vec![0u8; 28];
    let extended = vec![0u8; 56];
    let err = eng
        .reference_distances(
            DescriptorSet::single(&base).unwrap(),
            DescriptorSet::single(&extended).unwrap(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        AlphaGammaError::DescriptorLengthMismatch {
            left: 28,
            right: 56,
        }
    );
}

#[test]
fn unexpected_row_counts_are_rejected() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let eng = DistanceEngine::new(layout);
    let data = vec![0u8; 30];
    let set = DescriptorSet::single(&data).unwrap();
    assert_eq!(
        eng.reference_distances(set, set).unwrap_err(),
        AlphaGammaError::DescriptorSizeMismatch {
            got: 30,
            base: 28,
            extended: 56,
        }
    );

    // Unpacked rows handed to the packed kernel.
    let unpacked = vec![0u8; 28];
    let set = DescriptorSet::single(&unpacked).unwrap();
    assert_eq!(
        eng.packed_distances(set, set).unwrap_err(),
        AlphaGammaError::DescriptorSizeMismatch {
            got: 28,
            base: 4,
            extended: 8,
        }
    );
}

#[test]
fn invalid_weights_are_rejected() {
    let layout = DescriptorLayout::new(2, 2).unwrap();
    let eng = DistanceEngine::new(layout).with_config(DistanceConfig {
        weights: Weights::new(-1.0, 1.0, 1.0),
        ..DistanceConfig::default()
    });
    let data = vec![0u8; 6];
    let set = DescriptorSet::single(&data).unwrap();
    assert!(matches!(
        eng.reference_distances(set, set),
        Err(AlphaGammaError::InvalidWeights { .. })
    ));

    let nan = DistanceConfig {
        weights: Weights::new(5.0, f64::NAN, 1.0),
        ..DistanceConfig::default()
    };
    assert!(nan.validate().is_err());
}

#[test]
fn buffer_shorter_than_shape_is_rejected() {
    let data = [0u8; 10];
    assert_eq!(
        DescriptorSet::new(&data, 4, 3).unwrap_err(),
        AlphaGammaError::BufferTooSmall { needed: 12, got: 10 }
    );
}

#[test]
fn low_level_driver_rejects_rows_that_do_not_fit_the_plan() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let extended = DistancePlan::for_kernel::<ReferenceKernel>(
        layout,
        Variant::Extended,
        Weights::default(),
        None,
    )
    .unwrap();
    let base = vec![0u8; 28 * 2];
    let set = DescriptorSet::new(&base, 28, 2).unwrap();
    assert_eq!(
        compute_distances::<ReferenceKernel>(set, set, &extended).unwrap_err(),
        AlphaGammaError::DescriptorSizeMismatch {
            got: 28,
            base: 28,
            extended: 56,
        }
    );

    let long = vec![0u8; 56];
    let other = DescriptorSet::single(&long).unwrap();
    assert_eq!(
        compute_distances::<ReferenceKernel>(set, other, &extended).unwrap_err(),
        AlphaGammaError::DescriptorLengthMismatch {
            left: 28,
            right: 56,
        }
    );
}

#[test]
fn low_level_driver_rejects_a_plan_built_for_another_kernel() {
    let layout = DescriptorLayout::new(4, 6).unwrap();
    let packed_plan = DistancePlan::for_kernel::<PackedKernel>(
        layout,
        Variant::Extended,
        Weights::default(),
        Some(FieldWeighting::Separate),
    )
    .unwrap();
    let data = vec![0u8; 56];
    let set = DescriptorSet::single(&data).unwrap();
    assert!(matches!(
        compute_distances::<ReferenceKernel>(set, set, &packed_plan),
        Err(AlphaGammaError::InvalidInput(_))
    ));

    // The matching plan over the same rows is accepted.
    let reference_plan = DistancePlan::for_kernel::<ReferenceKernel>(
        layout,
        Variant::Extended,
        Weights::default(),
        None,
    )
    .unwrap();
    let mut desc2 = data.clone();
    desc2[28] = 1; // one alpha confidence disagreement
    let other = DescriptorSet::single(&desc2).unwrap();
    let m = compute_distances::<ReferenceKernel>(set, other, &reference_plan).unwrap();
    assert_eq!(m.as_slice(), &[5.0]);
}
