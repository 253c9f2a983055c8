//! Concurrency tests for termsync.
//!
//! Operations share nothing but the data root. These tests check that
//! concurrent requests stay independent and that same-path writes end with
//! one complete copy from one of the writers.

mod common;

use std::sync::Arc;

use termsync::file::UploadBlob;
use termsync::SyncGateway;

use common::{test_config, SECRET};

fn setup_gateway() -> (tempfile::TempDir, Arc<SyncGateway>) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), false);
    let gateway = SyncGateway::from_config(&config).unwrap();
    (dir, Arc::new(gateway))
}

/// Uploads of the same filename race; the survivor is one writer's full content.
#[tokio::test]
async fn test_concurrent_same_name_uploads() {
    let (dir, gateway) = setup_gateway();
    let token = gateway.issue_token("U001", SECRET, None).unwrap().payload.token;

    const NUM_UPLOADS: usize = 10;

    let mut handles = Vec::new();
    for i in 0..NUM_UPLOADS {
        let gateway = Arc::clone(&gateway);
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let content = vec![b'a' + i as u8; 4096];
            gateway.upload(&token, vec![UploadBlob::new("same.bin", content)])
        }));
    }

    for handle in handles {
        let reply = handle.await.expect("Task panicked").expect("upload failed");
        assert_eq!(reply.payload.uploaded_files, vec!["same.bin".to_string()]);
    }

    let stored = std::fs::read(dir.path().join("uploads/U001/same.bin")).unwrap();
    assert_eq!(stored.len(), 4096);
    let first = stored[0];
    assert!((b'a'..b'a' + NUM_UPLOADS as u8).contains(&first));
    assert!(stored.iter().all(|&b| b == first), "content was interleaved");
}

/// Concurrent terminals each land in their own folder.
#[tokio::test]
async fn test_concurrent_uploads_from_different_folders() {
    let (dir, gateway) = setup_gateway();

    let mut handles = Vec::new();
    for subject in ["U001", "U002"] {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            let token = gateway.issue_token(subject, SECRET, None)?.payload.token;
            for n in 0..5 {
                let name = format!("{subject}_{n}.txt");
                gateway.upload(&token, vec![UploadBlob::new(name, subject)])?;
            }
            Ok::<_, termsync::SyncError>(())
        }));
    }
    for handle in handles {
        handle.await.expect("Task panicked").unwrap();
    }

    for subject in ["U001", "U002"] {
        let mut names: Vec<String> = std::fs::read_dir(dir.path().join("uploads").join(subject))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all(|n| n.starts_with(subject)));
    }
}

/// A metadata walk racing sync writes still returns a usable result.
#[tokio::test]
async fn test_metadata_during_sync_writes() {
    let (_dir, gateway) = setup_gateway();
    let sync = gateway
        .issue_token("sync_client", SECRET, None)
        .unwrap()
        .payload
        .token;

    let writer = {
        let gateway = Arc::clone(&gateway);
        let sync = sync.clone();
        tokio::spawn(async move {
            for n in 0..20 {
                let target = format!("downloads/file_{n}.txt");
                gateway.sync_place(&sync, &target, b"payload").unwrap();
            }
        })
    };

    let reply = gateway.metadata(&sync).await.unwrap();
    writer.await.expect("Task panicked");

    for (path, record) in &reply.payload.files {
        assert!(path.starts_with("downloads/"));
        assert!(record.size <= 7);
    }

    let settled = gateway.metadata(&sync).await.unwrap();
    assert_eq!(settled.payload.files.len(), 20);
    assert!(settled.payload.skipped.is_empty());
}
