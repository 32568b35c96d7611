//! Live dataset source: polls a JSON file and publishes each new version.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::vpp::VppDataset;

/// Latest successfully parsed dataset, `None` until the first load.
pub type DatasetReceiver = watch::Receiver<Option<Arc<VppDataset>>>;

pub struct DatasetWatcher {
    path: PathBuf,
    poll_interval: Duration,
    last_modified: Option<SystemTime>,
    sender: watch::Sender<Option<Arc<VppDataset>>>,
}

impl DatasetWatcher {
    pub fn new(path: PathBuf, poll_interval: Duration) -> (Self, DatasetReceiver) {
        let (sender, receiver) = watch::channel(None);
        (
            Self {
                path,
                poll_interval,
                last_modified: None,
                sender,
            },
            receiver,
        )
    }

    /// Check the file once. Publishes and returns true when a changed,
    /// parseable dataset was found. Unparseable versions are logged and
    /// skipped so the last good dataset stays on screen.
    pub fn poll_once(&mut self) -> bool {
        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                debug!("Cannot stat {}: {}", self.path.display(), e);
                return false;
            }
        };
        if self.last_modified == Some(modified) {
            return false;
        }
        self.last_modified = Some(modified);

        match VppDataset::load(&self.path) {
            Ok(dataset) => {
                info!(
                    "Loaded {} ({} angles, {} wind speeds)",
                    self.path.display(),
                    dataset.angles.len(),
                    dataset.speeds.len()
                );
                let _ = self.sender.send(Some(Arc::new(dataset)));
                true
            }
            Err(e) => {
                warn!("Ignoring unreadable dataset {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut poll_interval = interval(self.poll_interval);

        loop {
            poll_interval.tick().await;
            self.poll_once();

            if self.sender.is_closed() {
                debug!("All dataset receivers dropped, stopping watcher");
                return Ok(());
            }
        }
    }
}

/// Spawn a watcher for `path` on the current tokio runtime.
pub fn start_watcher(path: PathBuf, poll_interval: Duration) -> DatasetReceiver {
    let (watcher, receiver) = DatasetWatcher::new(path, poll_interval);
    tokio::spawn(async move {
        if let Err(e) = watcher.run().await {
            warn!("Dataset watcher stopped: {}", e);
        }
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"{"angles": [45], "speeds": [6], "45": [6]}"#;

    #[test]
    fn publishes_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polar.json");
        std::fs::write(&path, DATASET).unwrap();

        let (mut watcher, rx) = DatasetWatcher::new(path, Duration::from_millis(10));
        assert!(watcher.poll_once());
        assert_eq!(rx.borrow().as_ref().map(|d| d.speeds.clone()), Some(vec![6.0]));
        assert!(!watcher.poll_once());
    }

    #[test]
    fn bad_versions_keep_last_good_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polar.json");
        std::fs::write(&path, "{ not json").unwrap();

        let (mut watcher, rx) = DatasetWatcher::new(path, Duration::from_millis(10));
        assert!(!watcher.poll_once());
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let (mut watcher, _rx) =
            DatasetWatcher::new(PathBuf::from("/nonexistent/polar.json"), Duration::from_millis(10));
        assert!(!watcher.poll_once());
    }

    #[tokio::test]
    async fn spawned_watcher_delivers_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polar.json");
        std::fs::write(&path, DATASET).unwrap();

        let mut rx = start_watcher(path, Duration::from_millis(5));
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("watcher timed out")
            .unwrap();
        assert!(rx.borrow().is_some());
    }
}
