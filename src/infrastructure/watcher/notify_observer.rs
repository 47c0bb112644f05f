//! Notify-backed change observer
//!
//! Wraps `notify::RecommendedWatcher` (inotify on Linux) and translates raw
//! notify events into domain `ChangeEvent`s.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::ports::{ChangeHandler, ChangeObserver, ObserverError};
use crate::domain::value_objects::{ChangeEvent, ChangeKind};

type HandlerSlot = Arc<Mutex<Option<ChangeHandler>>>;

/// Recursive observer on top of the platform's recommended watcher.
///
/// The handler sits behind a mutex that the delivery thread holds for the
/// duration of each call. `stop` takes the same mutex to remove the handler,
/// so it waits out an in-flight call and nothing is delivered afterwards,
/// even if notify's thread outlives the watcher for a moment.
#[derive(Default)]
pub struct NotifyObserver {
    watcher: Option<RecommendedWatcher>,
    handler: HandlerSlot,
}

impl NotifyObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeObserver for NotifyObserver {
    fn start(&mut self, root: &Path, handler: ChangeHandler) -> Result<(), ObserverError> {
        if self.watcher.is_some() {
            return Err(ObserverError::AlreadyRunning);
        }
        check_root(root)?;

        *lock(&self.handler) = Some(handler);

        let slot = Arc::clone(&self.handler);
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(change) = classify(&event) {
                        if let Some(handler) = lock(&slot).as_ref() {
                            handler(change);
                        }
                    }
                }
                Err(err) => tracing::warn!(error = %err, "Filesystem watch error"),
            },
            Config::default(),
        )
        .and_then(|mut watcher| {
            watcher.watch(root, RecursiveMode::Recursive)?;
            Ok(watcher)
        });

        match watcher {
            Ok(watcher) => {
                tracing::debug!(path = %root.display(), "Observer started");
                self.watcher = Some(watcher);
                Ok(())
            }
            Err(err) => {
                lock(&self.handler).take();
                Err(ObserverError::Watch {
                    path: root.to_path_buf(),
                    message: err.to_string(),
                })
            }
        }
    }

    fn stop(&mut self) {
        let Some(watcher) = self.watcher.take() else {
            return;
        };
        lock(&self.handler).take();
        drop(watcher);
        tracing::debug!("Observer stopped");
    }

    fn is_running(&self) -> bool {
        self.watcher.is_some()
    }
}

impl Drop for NotifyObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn check_root(root: &Path) -> Result<(), ObserverError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ObserverError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ObserverError::NotFound {
            path: root.to_path_buf(),
        }),
        Err(err) => Err(ObserverError::Watch {
            path: root.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

fn lock(slot: &HandlerSlot) -> MutexGuard<'_, Option<ChangeHandler>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Map a raw notify event onto a domain change event.
///
/// Deleted and moved-away paths no longer exist, so unless the backend says
/// "folder" they are reported as files. A rescan request means events were
/// lost, so it is kept even without paths. Other events without paths are
/// dropped.
pub(crate) fn classify(event: &Event) -> Option<ChangeEvent> {
    if event.need_rescan() {
        return Some(ChangeEvent::new(ChangeKind::Rescan, event.paths.clone()));
    }
    let primary = event.paths.first()?;

    let kind = match event.kind {
        EventKind::Create(CreateKind::Folder) => ChangeKind::DirCreated,
        EventKind::Create(CreateKind::File) => ChangeKind::FileCreated,
        EventKind::Create(_) if primary.is_dir() => ChangeKind::DirCreated,
        EventKind::Create(_) => ChangeKind::FileCreated,
        EventKind::Remove(RemoveKind::Folder) => ChangeKind::DirDeleted,
        EventKind::Remove(_) => ChangeKind::FileDeleted,
        EventKind::Modify(ModifyKind::Name(_)) => {
            // Destination is last when both ends are known.
            let landed = event.paths.last().unwrap_or(primary);
            if landed.is_dir() {
                ChangeKind::DirMoved
            } else {
                ChangeKind::FileMoved
            }
        }
        EventKind::Modify(_) if primary.is_dir() => ChangeKind::DirModified,
        EventKind::Modify(_) => ChangeKind::FileModified,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => ChangeKind::Other,
    };

    Some(ChangeEvent::new(kind, event.paths.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, DataChange, Flag, MetadataKind, RenameMode};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |ev, p| ev.add_path(p.to_path_buf()))
    }

    #[test]
    fn classify_create_kinds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("new.gcode");

        let ev = classify(&event(EventKind::Create(CreateKind::File), &[&file])).unwrap();
        assert_eq!(ev.kind, ChangeKind::FileCreated);

        let ev = classify(&event(EventKind::Create(CreateKind::Folder), &[&file])).unwrap();
        assert_eq!(ev.kind, ChangeKind::DirCreated);

        let ev = classify(&event(EventKind::Create(CreateKind::Any), &[dir.path()])).unwrap();
        assert_eq!(ev.kind, ChangeKind::DirCreated);
    }

    #[test]
    fn classify_remove_kinds() {
        let gone = PathBuf::from("/nonexistent/usbshare/gone");

        let ev = classify(&event(EventKind::Remove(RemoveKind::File), &[&gone])).unwrap();
        assert_eq!(ev.kind, ChangeKind::FileDeleted);

        let ev = classify(&event(EventKind::Remove(RemoveKind::Folder), &[&gone])).unwrap();
        assert_eq!(ev.kind, ChangeKind::DirDeleted);

        let ev = classify(&event(EventKind::Remove(RemoveKind::Any), &[&gone])).unwrap();
        assert_eq!(ev.kind, ChangeKind::FileDeleted);
    }

    #[test]
    fn classify_modify_data_and_metadata() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("part.gcode");
        fs::write(&file, "G28").unwrap();

        let data = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert_eq!(
            classify(&event(data, &[&file])).unwrap().kind,
            ChangeKind::FileModified
        );

        let meta = EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any));
        assert_eq!(
            classify(&event(meta, &[dir.path()])).unwrap().kind,
            ChangeKind::DirModified
        );
    }

    #[test]
    fn classify_rename_uses_destination() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("renamed");
        fs::create_dir(&sub).unwrap();
        let old = dir.path().join("old");

        let both = EventKind::Modify(ModifyKind::Name(RenameMode::Both));
        let ev = classify(&event(both, &[&old, &sub])).unwrap();
        assert_eq!(ev.kind, ChangeKind::DirMoved);
        assert_eq!(ev.paths, vec![old.clone(), sub.clone()]);

        let from = EventKind::Modify(ModifyKind::Name(RenameMode::From));
        let ev = classify(&event(from, &[&old])).unwrap();
        assert_eq!(ev.kind, ChangeKind::FileMoved);
    }

    #[test]
    fn classify_access_is_other() {
        let file = PathBuf::from("/tmp/x");
        let ev = classify(&event(EventKind::Access(AccessKind::Any), &[&file])).unwrap();
        assert_eq!(ev.kind, ChangeKind::Other);
    }

    #[test]
    fn classify_without_paths_is_dropped() {
        assert!(classify(&Event::new(EventKind::Any)).is_none());
    }

    #[test]
    fn classify_queue_overflow_is_actionable_rescan() {
        // inotify reports an overflowed queue as a pathless Other event.
        let overflow = Event::new(EventKind::Other).set_flag(Flag::Rescan);

        let ev = classify(&overflow).unwrap();
        assert_eq!(ev.kind, ChangeKind::Rescan);
        assert!(ev.paths.is_empty());
        assert!(crate::domain::value_objects::EventFilter::default().is_actionable(&ev));
    }

    #[test]
    fn start_on_missing_root_is_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut observer = NotifyObserver::new();

        let err = observer.start(&missing, Box::new(|_| {})).unwrap_err();
        assert!(matches!(err, ObserverError::NotFound { .. }));
        assert!(!observer.is_running());
    }

    #[test]
    fn start_on_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("image.bin");
        fs::write(&file, "").unwrap();
        let mut observer = NotifyObserver::new();

        let err = observer.start(&file, Box::new(|_| {})).unwrap_err();
        assert!(matches!(err, ObserverError::NotADirectory { .. }));
    }

    #[test]
    fn second_start_is_rejected() {
        let dir = tempdir().unwrap();
        let mut observer = NotifyObserver::new();
        observer.start(dir.path(), Box::new(|_| {})).unwrap();

        let err = observer.start(dir.path(), Box::new(|_| {})).unwrap_err();
        assert!(matches!(err, ObserverError::AlreadyRunning));
        observer.stop();
    }

    #[test]
    fn stop_waits_for_in_flight_handler() {
        let dir = tempdir().unwrap();
        let (entered_tx, entered_rx) = mpsc::channel();
        let entered_tx = Mutex::new(entered_tx);
        let finished = Arc::new(AtomicBool::new(false));
        let finished_in_handler = Arc::clone(&finished);

        let mut observer = NotifyObserver::new();
        observer
            .start(
                dir.path(),
                Box::new(move |_| {
                    if finished_in_handler.load(Ordering::SeqCst) {
                        return;
                    }
                    let _ = entered_tx.lock().unwrap().send(());
                    thread::sleep(Duration::from_millis(300));
                    finished_in_handler.store(true, Ordering::SeqCst);
                }),
            )
            .unwrap();

        fs::write(dir.path().join("slow.gcode"), "G28").unwrap();
        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("handler never entered");

        observer.stop();
        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn delivers_nested_changes_and_goes_quiet_after_stop() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("prints/today");
        fs::create_dir_all(&nested).unwrap();

        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let mut observer = NotifyObserver::new();
        observer
            .start(
                dir.path(),
                Box::new(move |event| {
                    let _ = tx.lock().unwrap().send(event);
                }),
            )
            .unwrap();
        assert!(observer.is_running());

        let target = nested.join("benchy.gcode");
        fs::write(&target, "G1 X10").unwrap();

        let seen = loop {
            let event = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("no event for nested write");
            if event.paths.iter().any(|p| p.ends_with("benchy.gcode"))
                && event.kind == ChangeKind::FileModified
            {
                break event;
            }
        };
        assert_eq!(seen.kind, ChangeKind::FileModified);

        observer.stop();
        assert!(!observer.is_running());
        while rx.try_recv().is_ok() {}

        fs::write(nested.join("after-stop.gcode"), "G1").unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());

        // Stopping twice is harmless.
        observer.stop();
    }
}
