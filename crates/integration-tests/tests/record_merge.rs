//! Status Record Merge Semantics
//!
//! The status record is the one artifact every surface reads, so these
//! tests pin its behavior over the real store: the patches the pipeline
//! actually writes accumulate correctly, foreign keys survive, and crash
//! leftovers never wedge a job.

use serde_json::{json, Map, Value};

use glyphcast_core::domain::{ConvertOutcome, StatusRecord};
use glyphcast_core::port::{RecordStore, StorageError};
use glyphcast_infra_fs::{record_path, FsRecordStore};

fn patch(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("patch must be an object"),
    }
}

fn setup(id: &str) -> (tempfile::TempDir, FsRecordStore) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(id)).unwrap();
    let store = FsRecordStore::new(dir.path());
    (dir, store)
}

/// The exact two writes the pipeline performs for a successful job.
#[tokio::test]
async fn test_record_lifecycle_of_a_successful_job() {
    let (_tmp, store) = setup("job");
    let id = "job".to_string();

    let queued = StatusRecord::queued("cat.png", 1_700_000_099);
    store
        .merge(&id, queued.into_fields().unwrap())
        .await
        .unwrap();

    let outcome = ConvertOutcome::ready("png", (8, 4), 0.25);
    store.merge(&id, outcome.into_fields()).await.unwrap();

    let record = store.read(&id).await.unwrap().unwrap();
    assert_eq!(record["state"], "ready");
    assert_eq!(record["filename"], "cat.png");
    assert_eq!(record["created"], 1_700_000_099i64);
    assert_eq!(record["image_type"], "png");
    assert_eq!(record["image_size"], json!([8, 4]));
    assert_eq!(record["convert_time"], 0.25);
    assert_eq!(record.get("error"), None);

    println!("✅ Ready record carries submission and result fields");
}

/// A failed job keeps its submission context next to the error message.
#[tokio::test]
async fn test_record_lifecycle_of_a_failed_job() {
    let (_tmp, store) = setup("job");
    let id = "job".to_string();

    store
        .merge(
            &id,
            StatusRecord::queued("broken.gif", 7).into_fields().unwrap(),
        )
        .await
        .unwrap();
    store
        .merge(
            &id,
            ConvertOutcome::error("Image decode failed: truncated").into_fields(),
        )
        .await
        .unwrap();

    let record = store.read(&id).await.unwrap().unwrap();
    assert_eq!(record["state"], "error");
    assert_eq!(record["error"], "Image decode failed: truncated");
    // the submission fields still tell which upload failed
    assert_eq!(record["filename"], "broken.gif");
    assert_eq!(record["created"], 7);
    assert_eq!(record.get("image_type"), None);

    println!("✅ Error record keeps the submission context");
}

/// Keys written by other tooling between our writes survive both merges.
#[tokio::test]
async fn test_foreign_keys_survive_the_full_lifecycle() {
    let (_tmp, store) = setup("job");
    let id = "job".to_string();

    store
        .merge(&id, StatusRecord::queued("x.png", 1).into_fields().unwrap())
        .await
        .unwrap();
    store
        .merge(&id, patch(json!({"operator_note": "checked by hand"})))
        .await
        .unwrap();
    store
        .merge(&id, ConvertOutcome::ready("png", (1, 1), 0.0).into_fields())
        .await
        .unwrap();

    let record = store.read(&id).await.unwrap().unwrap();
    assert_eq!(record["state"], "ready");
    assert_eq!(record["operator_note"], "checked by hand");

    println!("✅ Foreign record keys survive the full lifecycle");
}

/// A meta.tmp left over from a crashed writer is replaced, never read.
#[tokio::test]
async fn test_stale_temp_file_does_not_disturb_merges() {
    let (tmp, store) = setup("job");
    let id = "job".to_string();
    let stale = record_path(tmp.path(), &id).with_extension("tmp");
    std::fs::write(&stale, b"garbage from a dead writer").unwrap();

    store
        .merge(&id, patch(json!({"state": "queued"})))
        .await
        .unwrap();

    let record = store.read(&id).await.unwrap().unwrap();
    assert_eq!(record, json!({"state": "queued"}));
    assert!(!stale.exists());

    println!("✅ Stale temp file is replaced on the next merge");
}

/// The record store never invents a job space. Merging into a missing one
/// fails instead of scattering files outside any job directory.
#[tokio::test]
async fn test_merge_into_missing_job_space_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsRecordStore::new(dir.path());

    let err = store
        .merge(&"ghost".to_string(), patch(json!({"state": "queued"})))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    println!("✅ Merge without a job space is refused");
}

/// Two store instances over the same root see each other's writes; the
/// store holds no in-memory state.
#[tokio::test]
async fn test_two_stores_over_one_root_converge() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("shared")).unwrap();
    let id = "shared".to_string();

    let store_a = FsRecordStore::new(dir.path());
    let store_b = FsRecordStore::new(dir.path());

    store_a.merge(&id, patch(json!({"a": 1}))).await.unwrap();
    store_b.merge(&id, patch(json!({"b": 2}))).await.unwrap();

    let record = store_b.read(&id).await.unwrap().unwrap();
    assert_eq!(record["a"], 1);
    assert_eq!(record["b"], 2);

    println!("✅ Stores over one root share the record");
}
