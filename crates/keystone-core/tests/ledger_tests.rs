use std::sync::Arc;

use keystone_core::{
    ledger::{self, LedgerRecords},
    models::Document,
    GeneratedProjectRecord, Project,
};

fn sample() -> LedgerRecords {
    let records = ledger::upsert(&ledger::empty(), "a.pdf", Some(Some(1)), Some(Some("Alpha".into())));
    let records = ledger::upsert(&records, "b.pdf", Some(Some(2)), None);
    let records = ledger::upsert(&records, "c.pdf", None, Some(Some("Gamma".into())));
    ledger::upsert(&records, "d.pdf", None, None)
}

#[test]
fn test_upsert_is_idempotent_for_every_patch_shape() {
    let patches: [(Option<Option<u64>>, Option<Option<String>>); 5] = [
        (None, None),
        (Some(Some(1)), None),
        (Some(None), Some(None)),
        (Some(Some(9)), Some(Some("Other".into()))),
        (None, Some(Some("Alpha".into()))),
    ];

    for filename in ["a.pdf", "new.pdf", "  b.pdf  "] {
        for (id, name) in &patches {
            let once = ledger::upsert(&sample(), filename, *id, name.clone());
            let twice = ledger::upsert(&once, filename, *id, name.clone());
            assert!(Arc::ptr_eq(&once, &twice), "{filename} {id:?} {name:?}");
        }
    }
}

#[test]
fn test_prune_never_drops_unlinked_records() {
    let live_sets: [Vec<Project>; 3] = [
        vec![],
        vec![Project::named(1, "Alpha")],
        vec![Project::named(2, "Beta"), Project::named(5, "gamma ")],
    ];

    for live in &live_sets {
        let pruned = ledger::prune(&sample(), live);
        assert!(pruned.iter().any(|r| r.filename == "d.pdf"));
    }
}

#[test]
fn test_prune_matches_names_case_insensitively() {
    let pruned = ledger::prune(
        &sample(),
        &[
            Project::named(1, "ALPHA"),
            Project::named(2, "Beta"),
            Project::named(3, " gamma"),
        ],
    );
    let names: Vec<&str> = pruned.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
}

#[test]
fn test_stored_blob_with_mixed_entries() {
    let records = ledger::parse_stored(r#"["a.pdf", {"filename":"a.pdf","projectId":5}]"#);
    assert_eq!(
        &*records,
        [GeneratedProjectRecord::new("a.pdf", Some(5), None)]
    );

    let reparsed = ledger::parse_stored(&ledger::serialize(&records).unwrap());
    assert_eq!(&*reparsed, &*records);
}

#[test]
fn test_annotate_marks_generated_documents() {
    let documents = vec![Document::new("a.pdf"), Document::new("z.pdf")];
    let entries = ledger::annotate(&documents, &sample());

    assert!(entries[0].has_generated_project());
    assert!(!entries[1].has_generated_project());
}
