use issue_mirror::{
    MappingDocument, MappingEntry, MappingError, MappingStore, NewRef, OldRef,
};

fn sample_document() -> MappingDocument {
    MappingDocument::new(
        "octocat/hello-world".to_string(),
        vec![
            MappingEntry {
                old: OldRef {
                    number: 5,
                    title: "Bug".to_string(),
                    state: "closed".to_string(),
                },
                new: NewRef {
                    number: 42,
                    url: "https://github.com/octocat/hello-world/issues/42".to_string(),
                },
            },
            MappingEntry {
                old: OldRef {
                    number: 7,
                    title: "Feature".to_string(),
                    state: "open".to_string(),
                },
                new: NewRef {
                    number: 43,
                    url: "https://github.com/octocat/hello-world/issues/43".to_string(),
                },
            },
        ],
    )
}

#[test]
fn write_then_read_round_trips_all_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = MappingStore::new(dir.path().join("mapping.json"));

    let document = sample_document();
    store.write(&document).unwrap();

    let loaded = store.read().unwrap();
    assert_eq!(loaded.repo, "octocat/hello-world");
    assert_eq!(loaded.mapping.len(), 2);
    assert_eq!(loaded.mapping[0].old.number, 5);
    assert_eq!(loaded.mapping[0].old.state, "closed");
    assert_eq!(loaded.mapping[0].new.number, 42);
    assert_eq!(loaded.mapping[1].old.title, "Feature");
    assert_eq!(
        loaded.mapping[1].new.url,
        "https://github.com/octocat/hello-world/issues/43"
    );
}

#[test]
fn reading_a_missing_file_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = MappingStore::new(dir.path().join("absent.json"));

    let result = store.read();
    assert!(matches!(result, Err(MappingError::Missing { .. })));

    // The message must point the operator at the creation phase.
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Run the migration phase first"));
}

#[test]
fn reading_a_corrupt_file_reports_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    let store = MappingStore::new(&path);

    // Valid JSON, but the mapping field is not an array of entries.
    std::fs::write(&path, r#"{"repo":"o/r","migratedAt":"2024-03-01T00:00:00Z","mapping":42}"#)
        .unwrap();
    assert!(matches!(store.read(), Err(MappingError::Corrupt { .. })));

    // Not JSON at all.
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(store.read(), Err(MappingError::Corrupt { .. })));
}

#[test]
fn writing_replaces_an_existing_artifact_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = MappingStore::new(dir.path().join("mapping.json"));

    store.write(&sample_document()).unwrap();

    let mut smaller = sample_document();
    smaller.mapping.truncate(1);
    store.write(&smaller).unwrap();

    let loaded = store.read().unwrap();
    assert_eq!(loaded.mapping.len(), 1);
    assert_eq!(loaded.mapping[0].old.number, 5);
}
