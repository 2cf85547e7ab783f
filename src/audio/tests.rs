use super::probe::read_media_info;
use super::registry::{FILE_SCHEME, file_uri};
use super::*;
use crate::library::SelectedFile;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn blob_uris_resolve_to_their_bytes() {
    let registry = BlobRegistry::default();
    let uri = registry.insert(Arc::from(&b"abc"[..]), "audio/mpeg").unwrap();
    assert!(uri.starts_with(BLOB_SCHEME));

    let other = registry.insert(Arc::from(&b"xyz"[..]), "audio/mpeg").unwrap();
    assert_ne!(uri, other);

    // Clones share the same blobs.
    let bytes = registry.clone().fetch(&uri).unwrap();
    assert_eq!(&bytes[..], b"abc");
}

#[test]
fn file_uris_read_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.mp3");
    fs::write(&path, b"on disk").unwrap();

    let uri = file_uri(&path);
    assert!(uri.starts_with(FILE_SCHEME));
    let bytes = BlobRegistry::default().fetch(&uri).unwrap();
    assert_eq!(&bytes[..], b"on disk");
}

#[test]
fn unknown_and_unsupported_uris_fail_to_open() {
    let registry = BlobRegistry::default();
    for uri in [
        format!("{BLOB_SCHEME}0000000000000000"),
        "https://example.com/a.mp3".to_string(),
        format!("{FILE_SCHEME}/definitely/not/here.mp3"),
    ] {
        assert!(
            matches!(registry.fetch(&uri), Err(BackendError::Open { .. })),
            "{uri} should not open"
        );
    }
}

#[test]
fn read_media_info_rejects_undecodable_bytes() {
    let bytes: Arc<[u8]> = Arc::from(&b"definitely not audio"[..]);
    let err = read_media_info("blob:rondo/test", bytes).unwrap_err();
    assert!(matches!(err, BackendError::Decode { .. }));
}

#[tokio::test]
async fn object_uris_follow_link_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.mp3");
    fs::write(&path, b"not audio").unwrap();
    let file = SelectedFile::from_path(path.clone());

    let bytes: Arc<[u8]> = Arc::from(&b"not audio"[..]);

    let registry = BlobRegistry::default();
    let linked = RodioProbe::new(registry.clone(), true);
    assert_eq!(
        linked.create_object_uri(&file, bytes.clone()),
        file_uri(&path)
    );

    let in_memory = RodioProbe::new(registry.clone(), false);
    let uri = in_memory.create_object_uri(&file, bytes.clone());
    assert!(uri.starts_with(BLOB_SCHEME));
    assert_eq!(&registry.fetch(&uri).unwrap()[..], b"not audio");

    // Garbage bytes surface as a metadata failure, not a panic.
    assert!(in_memory.probe(&uri, bytes).await.is_err());
}

#[tokio::test]
async fn linked_files_are_not_read_twice() {
    let dir = tempdir().unwrap();
    // Never written: only the bytes handed over exist.
    let path = dir.path().join("gone.mp3");
    let file = SelectedFile::from_path(path);
    let bytes: Arc<[u8]> = Arc::from(&b"not audio"[..]);

    let linked = RodioProbe::new(BlobRegistry::default(), true);
    let uri = linked.create_object_uri(&file, bytes.clone());
    let err = linked.probe(&uri, bytes).await.unwrap_err();
    assert!(matches!(err, BackendError::Decode { .. }), "{err}");
}
