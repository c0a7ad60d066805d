//! End-to-end scenarios exercising the full read/write/query/backup
//! surface, one test function per scenario.

use enosql::{Engine, Filter, IndexKind, Operator, Value};
use std::collections::BTreeMap;

fn obj(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn scenario_1_insert_and_find_via_scan() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(dir.path()).unwrap();
    let shop = engine.create_database("shop").unwrap();
    let items = shop.create_collection("items").unwrap();

    items.insert("a", obj(&[("name", Value::String("apple".into())), ("qty", Value::Int(3))])).unwrap();
    items.insert("b", obj(&[("name", Value::String("banana".into())), ("qty", Value::Int(5))])).unwrap();

    let found = items.find("name", &Value::String("apple".into()));
    assert_eq!(found.iter().map(|d| d.id.clone()).collect::<Vec<_>>(), vec!["a".to_string()]);
}

#[test]
fn scenario_2_indexed_lookup_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(dir.path()).unwrap();
    let shop = engine.create_database("shop").unwrap();
    let items = shop.create_collection("items").unwrap();

    items.insert("a", obj(&[("name", Value::String("apple".into())), ("qty", Value::Int(3))])).unwrap();
    items.insert("b", obj(&[("name", Value::String("banana".into())), ("qty", Value::Int(5))])).unwrap();
    items.create_index("qty", IndexKind::Unique);
    items.insert("c", obj(&[("name", Value::String("cherry".into())), ("qty", Value::Int(3))])).unwrap();

    let indexed = items.find("qty", &Value::Int(3));
    assert_eq!(indexed.iter().map(|d| d.id.clone()).collect::<Vec<_>>(), vec!["c".to_string()]);
}

#[test]
fn scenario_3_range_query_sort_skip_limit() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(dir.path()).unwrap();
    let db = engine.create_database("seq").unwrap();
    let nums = db.create_collection("nums").unwrap();
    for n in 0..10i64 {
        nums.insert(n.to_string(), obj(&[("n", Value::Int(n))])).unwrap();
    }

    let query = nums.new_query().filter("n", Operator::Gte, Value::Int(3)).sort_by("n", false).skip(2).limit(3);
    let results = query.execute();
    let ns: Vec<i64> = results.iter().map(|d| d.data.get("n").unwrap().as_f64().unwrap() as i64).collect();
    assert_eq!(ns, vec![7, 6, 5]);
}

#[test]
fn scenario_4_csv_import_with_id_field() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(dir.path()).unwrap();
    let db = engine.create_database("shop").unwrap();

    let csv_content = "_id,name,qty\n1,apple,3\n2,banana,5\n";
    let result = enosql::import::import_str(
        &db,
        "items",
        csv_content,
        enosql::ImportFormat::Csv,
        &enosql::ImportOptions { create_collection: true, ..Default::default() },
    )
    .unwrap();
    assert_eq!(result.imported, 2);
    assert_eq!(result.skipped, 0);

    let items = db.get_collection("items").unwrap();
    let found = items.find("name", &Value::String("banana".into()));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "2");
    assert_eq!(found[0].data.get("qty"), Some(&Value::Int(5)));
}

#[test]
fn scenario_5_regex_filter() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(dir.path()).unwrap();
    let db = engine.create_database("users").unwrap();
    let people = db.create_collection("people").unwrap();
    people.insert("1", obj(&[("email", Value::String("a@x.com".into()))])).unwrap();
    people.insert("2", obj(&[("email", Value::String("b@y.org".into()))])).unwrap();
    people.insert("3", obj(&[("email", Value::String("nope".into()))])).unwrap();

    let filter = Filter::new("email", Operator::Regex, Value::String("@.*\\.com$".into()));
    let results = people.query(&[filter], None, 0, 0);
    assert_eq!(results.iter().map(|d| d.id.clone()).collect::<Vec<_>>(), vec!["1".to_string()]);
}

#[test]
fn scenario_6_backup_restore_under_new_name() {
    let data_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(data_dir.path()).unwrap();

    let orig = engine.create_database("orig").unwrap();
    let items = orig.create_collection("items").unwrap();
    items.insert("a", obj(&[("name", Value::String("apple".into()))])).unwrap();
    items.insert("b", obj(&[("name", Value::String("banana".into()))])).unwrap();
    engine.save_database("orig").unwrap();

    let info = enosql::backup::create_backup(&engine, "orig", "nightly", backup_dir.path()).unwrap();
    enosql::backup::restore_backup(&engine, &info.path, "copy").unwrap();

    let names = engine.list_databases().unwrap();
    assert!(names.contains(&"orig".to_string()));
    assert!(names.contains(&"copy".to_string()));

    let copy = engine.get_database("copy").unwrap();
    assert_eq!(copy.path(), data_dir.path().join("copy.enosql"));
    let copy_items = copy.get_collection("items").unwrap();
    assert_eq!(copy_items.len(), orig.get_collection("items").unwrap().len());
    for doc in copy_items.get_all() {
        let original = orig.get_collection("items").unwrap().find("name", doc.data.get("name").unwrap());
        assert_eq!(original.len(), 1);
    }
}

#[test]
fn scenario_7_update_reindexes_document() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(dir.path()).unwrap();
    let db = engine.create_database("shop").unwrap();
    let items = db.create_collection("items").unwrap();

    items.insert("a", obj(&[("name", Value::String("apple".into())), ("qty", Value::Int(3))])).unwrap();
    items.create_index("qty", IndexKind::Unique);

    items.update("a", obj(&[("name", Value::String("apple".into())), ("qty", Value::Int(7))])).unwrap();

    assert!(items.find("qty", &Value::Int(3)).is_empty());
    let found = items.find("qty", &Value::Int(7));
    assert_eq!(found.iter().map(|d| d.id.clone()).collect::<Vec<_>>(), vec!["a".to_string()]);
}
