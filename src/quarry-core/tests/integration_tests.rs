//! Integration tests for quarry-core
//!
//! These cover the lattice, the literal evaluator and the catalog together,
//! plus property tests for the invariants the rewrite rules rely on.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use quarry_core::*;

#[test]
fn test_catalog_is_object_safe_and_shareable() {
    let catalog: Arc<dyn Catalog> = Arc::new(BuiltinCatalog::with_builtins());
    let handle = Arc::clone(&catalog);
    let resolved = std::thread::spawn(move || handle.lookup_function("upper", &[DataType::Char]))
        .join()
        .unwrap();
    assert_eq!(resolved.unwrap().return_type, DataType::Varchar);
}

#[test]
fn test_string_and_int_compare_as_double() {
    let common = compatible_type_for_binary(&DataType::Varchar, &DataType::Int).unwrap();
    assert_eq!(common, DataType::Double);

    // A numeric literal never folds into a string column.
    assert!(cast_value(&Value::Int(5), &DataType::Varchar).is_err());
    assert_eq!(cast_value(&Value::Int(5), &common).unwrap().to_string(), "5");
}

#[test]
fn test_in_list_keeps_date_semantics() {
    let types = [DataType::Date, DataType::Varchar, DataType::Varchar];
    assert_eq!(compatible_type_for_between_and_in(&types).unwrap(), DataType::Date);
    assert_eq!(compatible_type_for_case_when(&types).unwrap(), DataType::DateTime);

    let folded = cast_value(&Value::from("2024-05-06"), &DataType::Date).unwrap();
    assert_eq!(folded, Value::Date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()));
    assert_eq!(folded.to_string(), "2024-05-06");
}

#[test]
fn test_data_type_serde_round_trip() {
    let ty = DataType::array(DataType::BigInt);
    let json = serde_json::to_string(&ty).unwrap();
    let back: DataType = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ty);
}

fn arb_scalar_type() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Null),
        Just(DataType::Boolean),
        Just(DataType::TinyInt),
        Just(DataType::SmallInt),
        Just(DataType::Int),
        Just(DataType::BigInt),
        Just(DataType::LargeInt),
        Just(DataType::Float),
        Just(DataType::Double),
        Just(DataType::Varchar),
        Just(DataType::Char),
        Just(DataType::Date),
        Just(DataType::DateTime),
    ]
}

fn arb_type() -> impl Strategy<Value = DataType> {
    arb_scalar_type().prop_recursive(2, 4, 1, |inner| inner.prop_map(DataType::array))
}

proptest! {
    #[test]
    fn prop_binary_compatibility_is_commutative(a in arb_type(), b in arb_type()) {
        let ab = compatible_type_for_binary(&a, &b).ok();
        let ba = compatible_type_for_binary(&b, &a).ok();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn prop_compatible_type_is_reachable_from_both_sides(a in arb_type(), b in arb_type()) {
        if let Ok(common) = compatible_type_for_binary(&a, &b) {
            prop_assert_eq!(compatible_type_for_binary(&a, &common).ok(), Some(common.clone()));
            prop_assert_eq!(compatible_type_for_binary(&b, &common).ok(), Some(common));
        }
    }

    #[test]
    fn prop_integer_widening_preserves_text(v in any::<i32>()) {
        for target in [DataType::BigInt, DataType::LargeInt, DataType::Double] {
            let cast = cast_value(&Value::Int(v), &target).unwrap();
            prop_assert_eq!(cast.to_string(), v.to_string());
        }
    }

    #[test]
    fn prop_integer_narrowing_is_range_checked(v in any::<i64>()) {
        let cast = cast_value(&Value::BigInt(v), &DataType::SmallInt);
        prop_assert_eq!(cast.is_ok(), i16::try_from(v).is_ok());
    }

    #[test]
    fn prop_non_strings_never_stringify(v in any::<i64>(), b in any::<bool>()) {
        prop_assert!(cast_value(&Value::BigInt(v), &DataType::Varchar).is_err());
        prop_assert!(cast_value(&Value::Boolean(b), &DataType::Varchar).is_err());
    }
}
