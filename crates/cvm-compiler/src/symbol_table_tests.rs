use crate::symbol_table::{BUCKETS, SymbolTable, hash};

#[test]
fn insert_and_lookup() {
    let mut table = SymbolTable::new();
    assert!(!table.insert("loop", 5));
    assert!(!table.insert("end", 17));

    assert_eq!(table.lookup("loop"), Some(5));
    assert_eq!(table.lookup("end"), Some(17));
    assert_eq!(table.lookup("missing"), None);
    assert_eq!(table.len(), 2);
}

#[test]
fn lookup_is_case_sensitive() {
    let mut table = SymbolTable::new();
    table.insert("Loop", 0);
    assert_eq!(table.lookup("loop"), None);
    assert!(table.contains("Loop"));
}

#[test]
fn insert_reports_existing_and_overwrites() {
    let mut table = SymbolTable::new();
    assert!(!table.insert("x", 1));
    assert!(table.insert("x", 9));
    assert_eq!(table.lookup("x"), Some(9));
    assert_eq!(table.len(), 1);
}

#[test]
fn hash_matches_polynomial() {
    assert_eq!(hash(""), 0);
    assert_eq!(hash("a"), 97);
    assert_eq!(hash("ab"), 97 * 31 + 98);
}

#[test]
fn colliding_names_chain() {
    // "Aa" and "BB" share a polynomial hash.
    assert_eq!(hash("Aa"), hash("BB"));

    let mut table = SymbolTable::new();
    table.insert("Aa", 1);
    table.insert("BB", 2);
    assert_eq!(table.lookup("Aa"), Some(1));
    assert_eq!(table.lookup("BB"), Some(2));
}

#[test]
fn many_labels_exceed_bucket_count() {
    let mut table = SymbolTable::new();
    for i in 0..BUCKETS * 3 {
        table.insert(&format!("l{i}"), i);
    }
    assert_eq!(table.len(), BUCKETS * 3);
    for i in 0..BUCKETS * 3 {
        assert_eq!(table.lookup(&format!("l{i}")), Some(i));
    }
}

#[test]
fn iter_yields_all() {
    let mut table = SymbolTable::new();
    table.insert("a", 0);
    table.insert("b", 5);
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort();
    assert_eq!(entries, vec![("a", 0), ("b", 5)]);
    assert!(!table.is_empty());
    assert!(SymbolTable::default().is_empty());
}
