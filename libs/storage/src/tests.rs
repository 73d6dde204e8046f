use std::collections::HashMap;
use std::fs;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use crate::{create_operator, ObjectStore, OpendalStore, StorageConfig, StoreError};

fn fs_store(dir: &TempDir) -> OpendalStore {
    let config = StorageConfig::Fs {
        root: dir.path().to_string_lossy().into_owned(),
    };
    let operator = create_operator(&config).expect("Failed to create FS operator");
    OpendalStore::new(HashMap::from([("vod".to_string(), operator)]))
}

#[tokio::test]
async fn test_fs_put_then_get() {
    let dir = TempDir::new().unwrap();
    let store = fs_store(&dir);

    store
        .put("a/b.json", "vod", "{}".to_string(), "application/json")
        .await
        .unwrap();
    let object = store.get("a/b.json", "vod").await.unwrap();

    assert_eq!(object.text().unwrap(), "{}");
    assert!(object.last_modified.is_some(), "fs should report mtime");
}

#[tokio::test]
async fn test_fs_get_reports_mtime_of_latest_write() {
    let dir = TempDir::new().unwrap();
    let store = fs_store(&dir);
    let path = dir.path().join("rec/playlist.m3u8");
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let write = |body: &str, mtime: SystemTime| {
        fs::write(&path, body).unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    };

    let old = SystemTime::now() - Duration::from_secs(3600);
    write("#EXTM3U\n1.ts\n", old);
    let object = store.get("rec/playlist.m3u8", "vod").await.unwrap();
    assert_eq!(object.text().unwrap(), "#EXTM3U\n1.ts\n");
    assert_eq!(
        object.last_modified.map(|t| t.timestamp()),
        Some(DateTime::<Utc>::from(old).timestamp())
    );

    let new = SystemTime::now();
    write("#EXTM3U\n1.ts\n2.ts\n#EXT-X-ENDLIST\n", new);
    let object = store.get("rec/playlist.m3u8", "vod").await.unwrap();
    assert!(object.text().unwrap().ends_with("#EXT-X-ENDLIST\n"));
    assert_eq!(
        object.last_modified.map(|t| t.timestamp()),
        Some(DateTime::<Utc>::from(new).timestamp())
    );
}

#[tokio::test]
async fn test_fs_missing_key_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = fs_store(&dir);

    let err = store.get("missing.json", "vod").await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_unknown_container() {
    let dir = TempDir::new().unwrap();
    let store = fs_store(&dir);

    let err = store.get("a.json", "other").await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownContainer(ref c) if c == "other"));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_put_overwrites() {
    let store = OpendalStore::new(HashMap::from([(
        "mem".to_string(),
        create_operator(&StorageConfig::Memory).unwrap(),
    )]));

    store
        .put("k", "mem", "first".to_string(), "text/plain")
        .await
        .unwrap();
    store
        .put("k", "mem", "second".to_string(), "text/plain")
        .await
        .unwrap();

    assert_eq!(store.get("k", "mem").await.unwrap().body, b"second");
}

#[tokio::test]
async fn test_s3_storage_config() {
    let config = StorageConfig::S3 {
        bucket: "vod-record-bucket".to_string(),
        root: "/recordings".to_string(),
        region: Some("us-east-1".to_string()),
        endpoint: Some("http://localhost:9000".to_string()),
        access_key_id: Some("minioadmin".to_string()),
        secret_access_key: Some("minioadmin".to_string()),
        disable_config_load: true,
        enable_virtual_host_style: false,
    };

    assert!(create_operator(&config).is_ok());
}

#[test]
fn test_default_storage_config() {
    match StorageConfig::default() {
        StorageConfig::Fs { root } => assert_eq!(root, "./vod"),
        _ => panic!("Default storage should be FS"),
    }
}

#[test]
fn test_containers_parsing() {
    let toml_str = r#"
[vod-record-bucket]
type = "s3"
bucket = "vod-record-bucket"
region = "us-west-2"

[scratch]
type = "memory"

[local]
type = "fs"
"#;

    let containers: HashMap<String, StorageConfig> =
        toml::from_str(toml_str).expect("Failed to parse containers");

    match &containers["vod-record-bucket"] {
        StorageConfig::S3 {
            bucket,
            root,
            region,
            disable_config_load,
            ..
        } => {
            assert_eq!(bucket, "vod-record-bucket");
            assert_eq!(root, "/");
            assert_eq!(region.as_deref(), Some("us-west-2"));
            assert!(!disable_config_load);
        }
        _ => panic!("Expected S3 storage config"),
    }
    assert!(matches!(containers["scratch"], StorageConfig::Memory));
    assert!(matches!(&containers["local"], StorageConfig::Fs { root } if root == "./vod"));
}
