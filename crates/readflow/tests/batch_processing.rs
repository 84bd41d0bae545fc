//! Batch linearization over files on disk, sync and async.

use std::fs;
use std::path::PathBuf;

use readflow::{LayoutConfig, ReadflowError, batch_linearize_files, linearize_files_batch};
use tempfile::{TempDir, tempdir};

fn page_json(left_word: &str, right_word: &str) -> String {
    format!(
        r#"{{"pages": [{{"blocks": [{{"lines": [{{"words": [
            {{"value": "{left_word}", "geometry": [[0.05, 0.10], [0.15, 0.12]]}},
            {{"value": "{right_word}", "geometry": [[0.55, 0.10], [0.70, 0.12]]}}
        ]}}]}}]}}]}}"#
    )
}

fn write_fixtures(count: usize) -> (TempDir, Vec<PathBuf>) {
    let dir = tempdir().unwrap();
    let paths = (0..count)
        .map(|i| {
            let path = dir.path().join(format!("resume_{i}.json"));
            fs::write(&path, page_json(&format!("Left{i}"), &format!("Right{i}"))).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

#[test]
fn test_sync_batch_in_input_order() {
    let (_dir, paths) = write_fixtures(10);
    let results = linearize_files_batch(&paths, &LayoutConfig::default());

    assert_eq!(results.len(), 10);
    for (i, result) in results.iter().enumerate() {
        assert!(result.success, "file {} failed: {:?}", i, result.error);
        assert_eq!(
            result.result.as_ref().unwrap().content,
            format!("Left{i}\n\nRight{i}")
        );
        assert!(result.file_path.ends_with(&format!("resume_{i}.json")));
    }
}

#[test]
fn test_sync_batch_missing_file_is_reported() {
    let (dir, mut paths) = write_fixtures(2);
    paths.insert(1, dir.path().join("missing.json"));

    let results = linearize_files_batch(&paths, &LayoutConfig::default());
    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].error.as_ref().unwrap().contains("does not exist"));
    assert!(results[2].success);
}

#[test]
fn test_batch_results_serialize_to_json() {
    let (_dir, paths) = write_fixtures(1);
    let results = linearize_files_batch(&paths, &LayoutConfig::default());

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["success"], true);
    assert_eq!(json[0]["result"]["content"], "Left0\n\nRight0");
    assert!(json[0].get("error").is_none());
}

#[tokio::test]
async fn test_async_batch_matches_sync_batch() {
    let (_dir, paths) = write_fixtures(8);
    let config = LayoutConfig {
        max_concurrent_documents: Some(3),
        ..Default::default()
    };

    let sync_results = linearize_files_batch(&paths, &config);
    let async_results = batch_linearize_files(paths.clone(), &config).await.unwrap();

    assert_eq!(sync_results.len(), async_results.len());
    for (sync_item, async_item) in sync_results.iter().zip(&async_results) {
        assert_eq!(sync_item.file_path, async_item.file_path);
        assert_eq!(sync_item.result, async_item.result);
    }
}

#[tokio::test]
async fn test_async_batch_unsupported_format_is_per_file() {
    let (dir, mut paths) = write_fixtures(1);
    let image = dir.path().join("scan.png");
    fs::write(&image, [0u8, 1, 2]).unwrap();
    paths.push(image);

    let results = batch_linearize_files(paths, &LayoutConfig::default()).await.unwrap();
    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].error.as_ref().unwrap().contains("Unsupported format"));
}

#[tokio::test]
async fn test_async_batch_rejects_invalid_config() {
    let (_dir, paths) = write_fixtures(1);
    let config = LayoutConfig {
        max_concurrent_documents: Some(0),
        ..Default::default()
    };

    let err = batch_linearize_files(paths, &config).await.unwrap_err();
    assert!(matches!(err, ReadflowError::Validation { .. }));
}
