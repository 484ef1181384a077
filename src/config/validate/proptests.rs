//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = ExperimentSpec> {
    (
        1u32..2048,                                              // size
        proptest::option::of(prop::array::uniform3(0.0f32..1.0)), // mean
        prop::array::uniform3(0.01f32..1.0),                     // std
    )
        .prop_map(|(size, mean, std)| {
            let mut spec = ExperimentSpec::default();
            spec.transform.size = size;
            if let Some(mean) = mean {
                spec.transform.mean = Some(mean.to_vec());
                spec.transform.std = Some(std.to_vec());
            }
            spec
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_valid_spec_has_fixed_transform_iff_stats(spec in arb_valid_spec()) {
        prop_assert_eq!(spec.transform.fixed().is_some(), spec.transform.mean.is_some());
    }

    #[test]
    fn prop_zero_size_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.transform.size = 0;
        prop_assert_eq!(validate_config(&spec), Err(ValidationError::InvalidSize(0)));
    }

    #[test]
    fn prop_negative_std_fails(spec in arb_valid_spec(), bad in -10.0f32..=0.0) {
        let mut spec = spec;
        spec.transform.mean = Some(vec![0.5; 3]);
        spec.transform.std = Some(vec![0.2, bad, 0.2]);
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidStd(_))
        ));
    }

    #[test]
    fn prop_wrong_channel_count_fails(len in (0usize..8).prop_filter("not rgb", |l| *l != 3)) {
        let mut spec = ExperimentSpec::default();
        spec.transform.mean = Some(vec![0.5; len]);
        spec.transform.std = Some(vec![0.2; 3]);
        prop_assert_eq!(
            validate_config(&spec),
            Err(ValidationError::InvalidChannelCount { field: "mean", len })
        );
    }

    #[test]
    fn prop_any_duplicate_category_fails(index in 0usize..16) {
        let mut spec = ExperimentSpec::default();
        let duplicate = spec.evaluation.categories[index].clone();
        spec.evaluation.categories.push(duplicate.clone());
        prop_assert_eq!(
            validate_config(&spec),
            Err(ValidationError::DuplicateCategory(duplicate))
        );
    }
}
