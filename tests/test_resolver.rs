use racknerd_relay::config::setup_logging;
use racknerd_relay::storage::{ImageId, ImageStore, ResolveError};

async fn open_store() -> (tempfile::TempDir, ImageStore) {
    let _ = setup_logging(true);
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ImageStore::open(dir.path()).await.expect("open store");
    (dir, store)
}

#[tokio::test]
async fn minted_ids_always_resolve_inside_root() {
    let (_dir, store) = open_store().await;
    for _ in 0..256 {
        let id = ImageId::mint();
        let path = store.resolve(id.as_str()).expect("minted id resolves");
        assert_eq!(path.parent(), Some(store.root()));
        assert!(path.starts_with(store.root()));
        assert_ne!(path, store.root());
    }
}

#[tokio::test]
async fn separators_and_parent_refs_are_rejected() {
    let (_dir, store) = open_store().await;
    for hostile in [
        "..",
        "../etc/passwd",
        "../../etc/passwd",
        "abc/def",
        "abc\\def",
        "..abc",
        "abc..",
        "/etc/passwd",
        "C:\\Windows",
    ] {
        assert_eq!(
            store.resolve(hostile),
            Err(ResolveError::Malformed),
            "{hostile}"
        );
    }
}

#[tokio::test]
async fn only_word_characters_are_allowed() {
    let (_dir, store) = open_store().await;
    for bad in ["", "-", "__", "a b", "a.b", "a%2e", "a\0b", "x:y", "emoji\u{1F600}", "\u{0661}"] {
        assert_eq!(store.resolve(bad), Err(ResolveError::Malformed), "{bad:?}");
    }
    for good in ["doesnotexist123", "A-b_C", "_x-", "0"] {
        assert!(store.resolve(good).is_ok(), "{good}");
    }
}

#[tokio::test]
async fn resolving_does_not_create_files() {
    let (_dir, store) = open_store().await;
    store.resolve("doesnotexist123").expect("well formed");
    assert!(store.list().await.expect("list").is_empty());
    assert!(!store.root().join("doesnotexist123.jpg").exists());
}

#[tokio::test]
async fn saved_images_are_listed_and_readable() {
    let (_dir, store) = open_store().await;
    let id = ImageId::mint();
    let path = store.save(&id, b"jpeg bytes").await.expect("save");
    assert_eq!(std::fs::read(&path).expect("read back"), b"jpeg bytes");
    assert_eq!(store.list().await.expect("list"), vec![id.to_string()]);
}

#[tokio::test]
async fn open_creates_missing_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("a").join("b");
    let store = ImageStore::open(&nested).await.expect("open nested");
    assert!(store.root().is_dir());
}
