//! Integration tests for loading, appending, querying and saving postcards.

use std::path::Path;

use chrono::NaiveDate;

use postcards::error::PostcardError;
use postcards::store::PostcardStore;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn loaded() -> PostcardStore {
    let mut store = PostcardStore::new();
    store.load_file(fixture("postcards0.txt")).unwrap();
    store
}

// ─── Loading ────────────────────────────────────────────────────────

#[test]
fn test_load_fixture_count() {
    let store = loaded();
    assert_eq!(store.count(), 8);
    assert_eq!(store.source(), Some(fixture("postcards0.txt").as_path()));
}

#[test]
fn test_load_missing_file() {
    let mut store = PostcardStore::new();
    let err = store.load_file(fixture("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, PostcardError::FileNotFound(_)));
    assert_eq!(store.count(), 0);
}

#[test]
fn test_malformed_file_leaves_store_empty() {
    let mut store = PostcardStore::new();
    let err = store.load_file(fixture("malformed.txt")).unwrap_err();
    assert!(matches!(err, PostcardError::Parse { line: 2, .. }));
    assert_eq!(store.count(), 0);
    assert!(store.query_by_sender("Sneezy").is_empty());
    assert!(store.source().is_none());
}

#[test]
fn test_malformed_append_keeps_loaded_postcards() {
    let mut store = loaded();
    assert!(store.append_file(fixture("malformed.txt")).is_err());
    assert_eq!(store.count(), 8);
    assert_eq!(store.query_by_sender("Sneezy").len(), 2);
}

#[test]
fn test_crlf_file_loads_and_keeps_terminators() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crlf.txt");
    std::fs::write(
        &path,
        "date:2010-06-23; from:Sneezy; to:Alice;\r\ndate:2009-12-12; from:Dopey; to:Peter;\r\n",
    )
    .unwrap();

    let mut store = PostcardStore::new();
    assert_eq!(store.load_file(&path).unwrap(), 2);
    assert_eq!(
        store.query_by_receiver("Peter"),
        vec!["date:2009-12-12; from:Dopey; to:Peter;\r\n"]
    );
    assert_eq!(store.query_by_sender("Sneezy").len(), 1);
}

#[test]
fn test_unpadded_date_is_indexed() {
    let mut store = PostcardStore::new();
    store
        .load(std::io::Cursor::new("date:2008-1-1; from:Huey; to:Dewey;\n"))
        .unwrap();
    assert_eq!(
        store.query_by_date_range(ymd(2008, 1, 1), ymd(2008, 1, 1)),
        vec!["date:2008-1-1; from:Huey; to:Dewey;\n"]
    );
}

#[test]
fn test_invalid_utf8_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, b"date:2010-06-23; from:Sn\xffezy; to:Alice;\n").unwrap();

    let mut store = PostcardStore::new();
    let err = store.load_file(&path).unwrap_err();
    assert!(matches!(err, PostcardError::Parse { line: 1, .. }));
    assert_eq!(store.count(), 0);
}

// ─── Queries ────────────────────────────────────────────────────────

#[test]
fn test_date_range_query() {
    let store = loaded();
    let hits = store.query_by_date_range(ymd(2008, 1, 1), ymd(2010, 12, 31));
    assert_eq!(
        hits,
        vec![
            "date:2008-03-23; from:Sneezy; to:Pluto;\n",
            "date:2008-06-03; from:Goofy; to:Pluto;\n",
            "date:2009-12-12; from:Dopey; to:Peter;\n",
            "date:2010-06-23; from:Sneezy; to:Alice;\n",
        ]
    );
}

#[test]
fn test_date_range_widening_is_monotonic() {
    let store = loaded();
    let ranges = [
        (ymd(2010, 6, 23), ymd(2010, 6, 23)),
        (ymd(2009, 1, 1), ymd(2010, 12, 31)),
        (ymd(2008, 1, 1), ymd(2012, 12, 31)),
        (ymd(2000, 1, 1), ymd(2020, 1, 1)),
    ];
    let mut previous: Vec<&str> = Vec::new();
    for (start, end) in ranges {
        let hits = store.query_by_date_range(start, end);
        assert!(
            previous.iter().all(|p| hits.contains(p)),
            "widening to {start}..={end} dropped a postcard"
        );
        previous = hits;
    }
    assert_eq!(previous.len(), store.count());
}

#[test]
fn test_sender_query_order() {
    let store = loaded();
    assert_eq!(
        store.query_by_sender("Daisy"),
        vec![
            "date:2012-05-01; from:Daisy; to:Goofy;\n",
            "date:2011-12-11; from:Daisy; to:Goofy;\n",
        ]
    );
}

#[test]
fn test_receiver_query() {
    let store = loaded();
    assert_eq!(
        store.query_by_receiver("Peter"),
        vec![
            "date:2009-12-12; from:Dopey; to:Peter;\n",
            "date:2007-11-30; from:Huey; to:Peter;\n",
        ]
    );
}

#[test]
fn test_unknown_names_are_empty() {
    let store = loaded();
    for name in ["Bashful", "SnowWhite", "sneezy", ""] {
        assert!(store.query_by_sender(name).is_empty());
        assert!(store.query_by_receiver(name).is_empty());
    }
}

#[test]
fn test_query_returns_original_text() {
    let text = std::fs::read_to_string(fixture("postcards0.txt")).unwrap();
    let store = loaded();
    let all = store.query_by_date_range(NaiveDate::MIN, NaiveDate::MAX);
    for line in all {
        assert!(text.contains(line), "'{line}' is not a line of the source");
    }
}

// ─── Appending ──────────────────────────────────────────────────────

#[test]
fn test_append_extends_queries() {
    let mut store = loaded();
    let added = store.append_file(fixture("postcards1.txt")).unwrap();
    assert_eq!(added, 3);
    assert_eq!(store.count(), 11);
    assert_eq!(store.source(), Some(fixture("postcards1.txt").as_path()));

    assert_eq!(
        store.query_by_sender("Sneezy"),
        vec![
            "date:2010-06-23; from:Sneezy; to:Alice;\n",
            "date:2008-03-23; from:Sneezy; to:Pluto;\n",
            "date:2016-10-23; from:Sneezy; to:Hook;\n",
        ]
    );
    assert_eq!(
        store.query_by_receiver("Hook"),
        vec!["date:2016-10-23; from:Sneezy; to:Hook;\n"]
    );
    // Last line of the appended file has no terminator and is kept that way.
    assert_eq!(
        store.query_by_receiver("Dopey"),
        vec!["date:2010-03-05; from:Goofy; to:Dopey;"]
    );
}

#[test]
fn test_append_preserves_bucket_order_within_shared_date() {
    let mut store = loaded();
    store
        .append(std::io::Cursor::new("date:2010-06-23; from:Bashful; to:Doc;\n"))
        .unwrap();
    assert_eq!(
        store.query_by_date_range(ymd(2010, 6, 23), ymd(2010, 6, 23)),
        vec![
            "date:2010-06-23; from:Sneezy; to:Alice;\n",
            "date:2010-06-23; from:Bashful; to:Doc;\n",
        ]
    );
}

#[test]
fn test_load_twice_accumulates() {
    let mut store = loaded();
    store.load_file(fixture("postcards0.txt")).unwrap();
    assert_eq!(store.count(), 16);
    assert_eq!(store.index().sender_bucket("Daisy"), &[2, 4, 10, 12]);
}

// ─── Saving ─────────────────────────────────────────────────────────

#[test]
fn test_write_file_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("saved.txt");

    let mut store = loaded();
    store.append_file(fixture("postcards1.txt")).unwrap();
    assert_eq!(store.write_file(&out).unwrap(), 11);

    let mut reloaded = PostcardStore::new();
    reloaded.load_file(&out).unwrap();
    assert_eq!(reloaded.count(), store.count());
    for (a, b) in store.iter().zip(reloaded.iter()) {
        assert_eq!(a.line(), b.line());
        assert_eq!((a.date, &a.sender, &a.receiver), (b.date, &b.sender, &b.receiver));
    }
}

#[test]
fn test_update_file_appends_after_existing_contents() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("saved.txt");
    let original = std::fs::read_to_string(fixture("postcards0.txt")).unwrap();
    std::fs::write(&out, &original).unwrap();

    let store = loaded();
    store.update_file(&out).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert_eq!(contents, format!("{original}{original}"));
}
