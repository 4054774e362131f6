//! Bounded polling for files appearing or settling

use crate::modules::error::ModuleError;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileSnapshot {
    len: u64,
    modified: Option<SystemTime>,
}

async fn snapshot(path: &Path) -> Option<FileSnapshot> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    Some(FileSnapshot {
        len: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

/// One check interval, cut short so the last poll lands on the deadline
fn next_pause(start: Instant, max_wait: Duration, check_interval: Duration) -> Duration {
    check_interval.min(max_wait.saturating_sub(start.elapsed()))
}

/// Polls every `check_interval` until `path` exists or `max_wait` elapses.
pub async fn wait_for_file_to_be_created(
    path: &Path,
    max_wait: Duration,
    check_interval: Duration,
) -> Result<(), ModuleError> {
    let start = Instant::now();
    loop {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            debug!("{} appeared after {:?}", path.display(), start.elapsed());
            return Ok(());
        }
        if start.elapsed() >= max_wait {
            return Err(ModuleError::Timeout {
                path: path.to_path_buf(),
                waited: start.elapsed(),
            });
        }
        sleep(next_pause(start, max_wait, check_interval)).await;
    }
}

/// Polls every `check_interval` until two consecutive checks see the same
/// size and modification time, or `max_wait` elapses.
pub async fn wait_for_file_to_be_unchanged(
    path: &Path,
    max_wait: Duration,
    check_interval: Duration,
) -> Result<(), ModuleError> {
    let start = Instant::now();
    let mut previous = snapshot(path).await;
    loop {
        if start.elapsed() >= max_wait {
            return Err(ModuleError::Timeout {
                path: path.to_path_buf(),
                waited: start.elapsed(),
            });
        }
        sleep(next_pause(start, max_wait, check_interval)).await;

        let current = snapshot(path).await;
        if current.is_some() && current == previous {
            debug!("{} settled after {:?}", path.display(), start.elapsed());
            return Ok(());
        }
        previous = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_file_returns_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("present");
        std::fs::write(&path, "x").unwrap();

        let start = Instant::now();
        tokio_test::assert_ok!(
            wait_for_file_to_be_created(&path, Duration::from_secs(5), Duration::from_secs(1))
                .await
        );
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_pause_never_overshoots_deadline() {
        let start = Instant::now();
        let pause = next_pause(start, Duration::from_secs(1), Duration::from_secs(5));
        assert!(pause <= Duration::from_secs(1));
        assert_eq!(
            next_pause(start, Duration::from_secs(60), Duration::from_millis(10)),
            Duration::from_millis(10)
        );
        assert_eq!(
            next_pause(start, Duration::ZERO, Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn test_missing_file_never_settles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");

        let result = wait_for_file_to_be_unchanged(
            &path,
            Duration::from_millis(200),
            Duration::from_millis(50),
        )
        .await;
        assert!(matches!(result, Err(ModuleError::Timeout { .. })));
    }
}
