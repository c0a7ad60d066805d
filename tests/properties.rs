//! Property-style tests for the stringification/compare rule, snapshot
//! round-trip, and aggregation sum identity.

use enosql::{AggFn, Engine, GroupKey, GroupOutput, Stage, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

proptest! {
    #[test]
    fn stringify_and_compare_agree_on_integers(a in any::<i64>(), b in any::<i64>()) {
        let ordering = enosql::value::compare(&Value::Int(a), &Value::Int(b));
        prop_assert_eq!(ordering, a.cmp(&b));
    }

    #[test]
    fn int_and_its_string_form_compare_equal(n in any::<i64>()) {
        let as_int = Value::Int(n);
        let as_string = Value::String(n.to_string());
        prop_assert_eq!(enosql::value::compare(&as_int, &as_string), std::cmp::Ordering::Equal);
    }

    #[test]
    fn snapshot_round_trips_through_json(names in prop::collection::vec("[a-z]{1,8}", 0..6), qtys in prop::collection::vec(0i64..1000, 0..6)) {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(dir.path()).unwrap();
        let db = engine.create_database("fuzz").unwrap();
        let items = db.create_collection("items").unwrap();
        let n = names.len().min(qtys.len());
        for i in 0..n {
            let mut data = BTreeMap::new();
            data.insert("name".to_string(), Value::String(names[i].clone()));
            data.insert("qty".to_string(), Value::Int(qtys[i]));
            items.insert(i.to_string(), data).unwrap();
        }
        engine.save_database("fuzz").unwrap();

        let reopened = Engine::new(dir.path()).unwrap();
        let reloaded = reopened.get_database("fuzz").unwrap();
        let reloaded_items = reloaded.get_collection("items").unwrap();
        prop_assert_eq!(reloaded_items.len(), n);
        for i in 0..n {
            let doc = reloaded_items.find("name", &Value::String(names[i].clone()));
            prop_assert!(doc.iter().any(|d| d.id == i.to_string()));
        }
    }

    #[test]
    fn aggregation_sum_identity(amounts in prop::collection::vec(-1000i64..1000, 0..20)) {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(dir.path()).unwrap();
        let db = engine.create_database("sales").unwrap();
        let sales = db.create_collection("sales").unwrap();
        for (i, amount) in amounts.iter().enumerate() {
            let mut data = BTreeMap::new();
            data.insert("region".to_string(), Value::String(if i % 2 == 0 { "east".to_string() } else { "west".to_string() }));
            data.insert("amount".to_string(), Value::Int(*amount));
            sales.insert(i.to_string(), data).unwrap();
        }

        let stages = vec![Stage::Group {
            by: GroupKey::Field("region".to_string()),
            outputs: vec![GroupOutput { name: "total".to_string(), func: AggFn::Sum, field: Some("amount".to_string()) }],
        }];
        let groups = enosql::aggregate::run(&sales, &stages).unwrap();
        let grouped_sum: f64 = groups.iter().map(|g| g.get("total").unwrap().as_f64().unwrap()).sum();
        let expected: i64 = amounts.iter().sum();
        prop_assert_eq!(grouped_sum, expected as f64);
    }
}
