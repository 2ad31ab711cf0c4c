//! Property-based tests for the value model.
//!
//! Verifies on generated values:
//! 1. `Ord` is a strict total order
//! 2. the operator comparison is antisymmetric and agrees with `Ord` equality
//! 3. lossless conversions round-trip

use el_types::{Value, ValueType};
use proptest::prelude::*;
use std::cmp::Ordering;

// -- Value Generation Strategies --

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        (-1000i32..1000).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9]{0,4}".prop_map(Value::from),
        prop::collection::vec(-10i64..10, 0..4).prop_map(Value::range),
        Just(Value::NULL),
        Just(Value::UNDEFINED),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-c]", inner, 0..3).prop_map(Value::from),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_order_is_antisymmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn prop_order_is_transitive(
        a in value_strategy(),
        b in value_strategy(),
        c in value_strategy(),
    ) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
        if a == b && b == c {
            prop_assert_eq!(&a, &c);
        }
    }

    #[test]
    fn prop_equal_values_compare_equal(a in value_strategy()) {
        let copy = a.clone();
        prop_assert_eq!(a.compare(&copy).ok(), Some(Ordering::Equal));
    }

    #[test]
    fn prop_compare_is_antisymmetric(a in value_strategy(), b in value_strategy()) {
        if let (Ok(ab), Ok(ba)) = (a.compare(&b), b.compare(&a)) {
            prop_assert_eq!(ab, ba.reverse());
        } else {
            prop_assert!(a.compare(&b).is_err() && b.compare(&a).is_err());
        }
    }

    #[test]
    fn prop_number_string_round_trip(n in prop::num::f64::POSITIVE
            | prop::num::f64::NEGATIVE
            | prop::num::f64::NORMAL
            | prop::num::f64::ZERO) {
        let v = Value::from(n);
        let back = v
            .convert_to(ValueType::String)
            .and_then(|s| s.convert_to(ValueType::Number))
            .unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn prop_boolean_round_trips(b in any::<bool>(), via in prop_oneof![
        Just(ValueType::String),
        Just(ValueType::Number),
    ]) {
        let v = Value::from(b);
        let back = v
            .convert_to(via)
            .and_then(|x| x.convert_to(ValueType::Boolean))
            .unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn prop_length_matches_contents(items in prop::collection::vec(-5i32..5, 0..8)) {
        let v = Value::from(items.clone());
        prop_assert_eq!(v.length().unwrap(), items.len());
        for i in 0..items.len() {
            prop_assert!(v.contains_index(i as i64));
            prop_assert!(v.contains_index(-(i as i64) - 1));
        }
        prop_assert!(!v.contains_index(items.len() as i64));
    }
}
