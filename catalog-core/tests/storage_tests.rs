use catalog_core::SessionStore;

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "artifact_catalog_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

#[tokio::test]
async fn session_store_persists_across_reloads() {
    let dir = temp_dir("store");
    let path = dir.join("session.json");

    let store = SessionStore::load_from(&path).await;
    store.set("token", "abc").await.unwrap();
    store.set("user", r#"{"userId":1}"#).await.unwrap();

    let reopened = SessionStore::load_from(&path).await;
    assert_eq!(reopened.get("token").await.as_deref(), Some("abc"));

    reopened.remove("token").await.unwrap();
    let again = SessionStore::load_from(&path).await;
    assert_eq!(again.get("token").await, None);
    assert!(again.get("user").await.is_some());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn load_uses_tmp_fallback_on_corrupted_json() {
    let dir = temp_dir("corrupt");
    tokio::fs::create_dir_all(&dir).await.unwrap();

    let path = dir.join("session.json");
    tokio::fs::write(&path, b"{ this is not json ").await.unwrap();
    tokio::fs::write(dir.join("session.json.tmp"), br#"{"token":"from-tmp"}"#)
        .await
        .unwrap();

    let store = SessionStore::load_from(&path).await;
    assert_eq!(store.get("token").await.as_deref(), Some("from-tmp"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn undecodable_json_value_reads_as_absent() {
    let store = SessionStore::in_memory();
    store.set("user", "not json").await.unwrap();
    let user: Option<catalog_core::User> = store.get_json("user").await;
    assert!(user.is_none());
}

#[tokio::test]
async fn unreadable_file_and_tmp_start_empty() {
    let dir = temp_dir("both_corrupt");
    tokio::fs::create_dir_all(&dir).await.unwrap();

    let path = dir.join("session.json");
    tokio::fs::write(&path, b"[1, 2").await.unwrap();
    tokio::fs::write(dir.join("session.json.tmp"), b"also broken").await.unwrap();

    let store = SessionStore::load_from(&path).await;
    assert_eq!(store.get("user").await, None);

    // the next write replaces the corrupted file
    store.set("token", "fresh").await.unwrap();
    let reopened = SessionStore::load_from(&path).await;
    assert_eq!(reopened.get("token").await.as_deref(), Some("fresh"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}
