//! Debounced change notifications.
//!
//! File-system watching itself happens elsewhere; this module only decides which
//! changed paths matter and coalesces bursts of them. Each relevant notification
//! resets a quiet-window timer and the callback runs once the window passes without
//! further notifications.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Whether a changed path should trigger a rebuild.
///
/// Working tree paths always do. Paths inside `.git/` do too, except `*.lock` files,
/// which git creates and removes around its own operations (e.g. `index.lock`).
pub fn is_relevant_change(path: &Path) -> bool {
    let components: Vec<Component> = path.components().collect();
    let Some(git_pos) = components
        .iter()
        .position(|c| c.as_os_str() == OsStr::new(".git"))
    else {
        return true;
    };

    let is_lock = path.extension() == Some(OsStr::new("lock"));
    !(is_lock && components.len() > git_pos + 1)
}

/// Coalesces change notifications on a background thread
pub struct ChangeDebouncer {
    sender: Option<Sender<PathBuf>>,
    worker: Option<JoinHandle<()>>,
}

impl ChangeDebouncer {
    /// Start the debounce thread; `on_quiet` runs once per burst of relevant changes
    pub fn spawn<F>(window: Duration, on_quiet: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<PathBuf>();
        let worker = thread::spawn(move || {
            let mut on_quiet = on_quiet;
            while let Ok(first) = receiver.recv() {
                log::debug!("Change burst started by {}", first.display());
                let mut deadline = Instant::now() + window;
                let mut disconnected = false;

                loop {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    match receiver.recv_timeout(deadline - now) {
                        Ok(_) => deadline = Instant::now() + window,
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => {
                            disconnected = true;
                            break;
                        }
                    }
                }

                on_quiet();
                if disconnected {
                    return;
                }
            }
        });

        ChangeDebouncer {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Report a changed path. Returns false when the path was filtered out.
    pub fn notify(&self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !is_relevant_change(&path) {
            log::debug!("Ignoring housekeeping change {}", path.display());
            return false;
        }
        match &self.sender {
            Some(sender) => sender.send(path).is_ok(),
            None => false,
        }
    }
}

impl Drop for ChangeDebouncer {
    /// A pending burst is flushed before the thread exits
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_working_tree_changes_are_relevant() {
        assert!(is_relevant_change(Path::new("/repo/src/main.rs")));
        assert!(is_relevant_change(Path::new("/repo/Cargo.lock")));
    }

    #[test]
    fn test_git_changes_are_relevant_except_locks() {
        assert!(is_relevant_change(Path::new("/repo/.git/HEAD")));
        assert!(is_relevant_change(Path::new("/repo/.git/index")));
        assert!(is_relevant_change(Path::new("/repo/.git/refs/heads/main")));
        assert!(!is_relevant_change(Path::new("/repo/.git/index.lock")));
        assert!(!is_relevant_change(Path::new("/repo/.git/refs/heads/main.lock")));
    }

    fn counting_debouncer(window: Duration) -> (ChangeDebouncer, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let debouncer = ChangeDebouncer::spawn(window, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (debouncer, count)
    }

    #[test]
    fn test_burst_is_coalesced() {
        let (debouncer, count) = counting_debouncer(Duration::from_millis(200));
        for i in 0..10 {
            assert!(debouncer.notify(format!("/repo/file{i}.txt")));
        }
        thread::sleep(Duration::from_millis(600));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        drop(debouncer);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_separate_bursts_run_separately() {
        let (debouncer, count) = counting_debouncer(Duration::from_millis(50));
        debouncer.notify("/repo/a.txt");
        thread::sleep(Duration::from_millis(400));
        debouncer.notify("/repo/b.txt");
        thread::sleep(Duration::from_millis(400));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_lock_files_never_trigger() {
        let (debouncer, count) = counting_debouncer(Duration::from_millis(50));
        assert!(!debouncer.notify("/repo/.git/index.lock"));
        thread::sleep(Duration::from_millis(200));
        drop(debouncer);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pending_burst_flushed_on_drop() {
        let (debouncer, count) = counting_debouncer(Duration::from_secs(10));
        debouncer.notify("/repo/a.txt");
        drop(debouncer);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
