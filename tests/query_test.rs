//! Query tests.
//!
//! Tests for evaluating textual queries against imported documents.

use serde_json::json;

use versa::{DocumentProvider, Error, Library, Metadata};

const SAMPLE: &str = include_str!("fixtures/sample.usfm");

fn sample_library() -> Library {
    let mut library = Library::new();
    library
        .import_document(Metadata::new("xxx", "yyy"), "usfm", SAMPLE)
        .unwrap();
    library
}

#[test]
fn test_documents_query() {
    let library = sample_library();

    let result = library.query("documents").unwrap();

    assert_eq!(result[0]["id"], "xxx_yyy_1");
    assert_eq!(result[0]["bookCode"], "GEN");
    assert_eq!(result[0]["headers"]["h"], "Genesis");
}

#[test]
fn test_header_query() {
    let library = sample_library();

    let result = library.query(r#"header(id: "bookCode")"#).unwrap();

    assert_eq!(result, json!([{"id": "xxx_yyy_1", "value": "GEN"}]));
}

#[test]
fn test_cv_index_query() {
    let library = sample_library();

    let result = library.query("cvIndex(chapter: 2)").unwrap();

    assert_eq!(result[0]["chapter"], 2);
    let verses = result[0]["verses"].as_array().unwrap();
    assert_eq!(verses.len(), 7);
    assert_eq!(
        verses[0],
        json!({"verseRange": "1", "text": "The heavens and the earth were finished."})
    );
    assert_eq!(
        verses[2],
        json!({"verseRange": "3", "text": "God blessed the seventh day and made it holy."})
    );
}

#[test]
fn test_blocks_query() {
    let library = sample_library();

    let result = library.query(r#"blocks(withScriptureCV: "2:3-6")"#).unwrap();

    let blocks = result[0]["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["bs"]["payload"], "blockTag/p");

    let items = blocks[0]["items"].as_array().unwrap();
    assert_eq!(
        items[0],
        json!({"type": "mark", "subType": "verses", "payload": "3"})
    );
    assert!(items.iter().all(|item| item["payload"] != "7"));
    assert!(
        items
            .iter()
            .any(|item| item["type"] == "graft" && item["subType"] == "xref")
    );
}

#[test]
fn test_invalid_query() {
    let library = sample_library();

    assert!(matches!(library.query("verses"), Err(Error::Query(_))));
    assert!(matches!(
        library.query("cvIndex(chapter: two)"),
        Err(Error::Query(_))
    ));
}
