//! Integration tests for search-driven exports.

use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;

use postcards::export::csv::export_csv;
use postcards::export::text::{save_postcards, SaveMode};
use postcards::store::PostcardStore;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn loaded() -> PostcardStore {
    let mut store = PostcardStore::new();
    store.load_file(fixture("postcards0.txt")).unwrap();
    store.append_file(fixture("postcards1.txt")).unwrap();
    store
}

#[test]
fn test_export_query_subset_as_text() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("goofy.txt");

    let store = loaded();
    let (_, results) = postcards::search::execute(&store, "to:Goofy").unwrap();
    let written = save_postcards(store.resolve(&results), out.path(), SaveMode::Overwrite).unwrap();
    assert_eq!(written, 2);

    out.assert(
        "date:2012-05-01; from:Daisy; to:Goofy;\n\
         date:2011-12-11; from:Daisy; to:Goofy;\n",
    );
    temp.close().unwrap();
}

#[test]
fn test_append_save_adds_newline_to_unterminated_line() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("dopey.txt");
    out.write_str("date:2001-01-01; from:Doc; to:Dopey;\n").unwrap();

    let store = loaded();
    let (_, results) = postcards::search::execute(&store, "to:Dopey").unwrap();
    save_postcards(store.resolve(&results), out.path(), SaveMode::Append).unwrap();

    out.assert(
        "date:2001-01-01; from:Doc; to:Dopey;\n\
         date:2010-03-05; from:Goofy; to:Dopey;\n",
    );
}

#[test]
fn test_export_csv_for_date_range() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("range.csv");

    let store = loaded();
    let (_, results) = postcards::search::execute(&store, "date:2009..2010").unwrap();
    let selected = store.resolve(&results);
    export_csv(&selected, out.path(), ';').unwrap();

    out.assert(predicate::str::starts_with("Date;From;To\n"));
    out.assert(predicate::str::contains("2009-11-08;Daisy;Minnie\n"));
    out.assert(predicate::str::contains("2010-06-23;Sneezy;Alice\n"));
    out.assert(predicate::str::contains("Pluto").not());
}

#[test]
fn test_write_file_output_matches_store_order() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("all.txt");

    let store = loaded();
    store.write_file(out.path()).unwrap();

    let expected: String = store
        .iter()
        .map(|p| format!("{}\n", p.line()))
        .collect();
    out.assert(expected);
}
