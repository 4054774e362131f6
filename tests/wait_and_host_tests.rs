//! File polling and host query tests

use hostctl::modules::{
    host, wait_for_file_to_be_created, wait_for_file_to_be_unchanged, ModuleError,
};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_wait_for_missing_file_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never");

    let start = Instant::now();
    let result =
        wait_for_file_to_be_created(&path, Duration::from_secs(1), Duration::from_secs(1)).await;
    let elapsed = start.elapsed();

    match result {
        Err(ModuleError::Timeout { path: timed_out, .. }) => assert_eq!(timed_out, path),
        other => panic!("Expected Timeout, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3));
}

#[tokio::test]
async fn test_long_check_interval_still_honours_max_wait() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never");

    let start = Instant::now();
    let result =
        wait_for_file_to_be_created(&path, Duration::from_secs(1), Duration::from_secs(5)).await;
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(ModuleError::Timeout { .. })));
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");

    let stable = dir.path().join("stable");
    std::fs::write(&stable, "content").unwrap();
    let start = Instant::now();
    wait_for_file_to_be_unchanged(&stable, Duration::from_secs(1), Duration::from_secs(5))
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_wait_for_file_created_later() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("later");

    let writer_path = path.clone();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::fs::write(&writer_path, "done").await.unwrap();
    });

    wait_for_file_to_be_created(&path, Duration::from_secs(5), Duration::from_millis(50))
        .await
        .unwrap();
    writer.await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_wait_for_stable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stable");
    std::fs::write(&path, "content").unwrap();

    wait_for_file_to_be_unchanged(&path, Duration::from_secs(5), Duration::from_millis(50))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wait_for_growing_file_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("growing");
    std::fs::write(&path, "").unwrap();

    let writer_path = path.clone();
    let writer = tokio::spawn(async move {
        for i in 0..30 {
            let mut content = tokio::fs::read(&writer_path).await.unwrap();
            content.extend_from_slice(format!("{i}\n").as_bytes());
            tokio::fs::write(&writer_path, content).await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    });

    let result = wait_for_file_to_be_unchanged(
        &path,
        Duration::from_millis(300),
        Duration::from_millis(100),
    )
    .await;
    assert!(matches!(result, Err(ModuleError::Timeout { .. })));
    writer.await.unwrap();
}

#[test]
fn test_display_matches_environment() {
    match std::env::var("DISPLAY") {
        Ok(value) => assert_eq!(host::display().unwrap(), value),
        Err(_) => assert!(matches!(
            host::display(),
            Err(ModuleError::MissingEnvironment { .. })
        )),
    }
}

#[test]
fn test_current_user_resolves() {
    let username = host::current_username().unwrap();
    assert!(!username.is_empty());

    let home = host::home_dir_of(&username).unwrap();
    assert!(home.is_absolute());
}

#[tokio::test]
async fn test_release_name_matches_os_release() {
    let os_release = std::fs::read_to_string("/etc/os-release").unwrap_or_default();
    let Some(expected) = host::parse_os_release(&os_release).remove("VERSION_CODENAME") else {
        return;
    };
    if expected.is_empty() {
        return;
    }
    let engine = hostctl::CommandEngine::default();
    let name = host::linux_release_name(&engine).await.unwrap();
    assert_eq!(name, expected);
}
