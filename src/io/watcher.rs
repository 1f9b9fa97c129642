use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::store::STORE_FILE;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// The task store was written by someone.
    Changed(PathBuf),
}

/// Watches the task directory for changes to the task store.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    /// Start watching `dir`. Call `poll()` each tick.
    pub fn start(dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "watch error");
                        return;
                    }
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Atomic saves land as a rename onto tasks.json
                if let Some(path) = event
                    .paths
                    .into_iter()
                    .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(STORE_FILE))
                {
                    let _ = tx.send(StoreEvent::Changed(path));
                }
            },
            Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking: whether any store change arrived since the last poll.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(StoreEvent::Changed(path)) = self.rx.try_recv() {
            tracing::trace!(path = %path.display(), "store changed");
            changed = true;
        }
        changed
    }
}
