use crate::app::{MemViewApp, OpenFile};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// Get the last modified time of the file
pub fn get_last_modified(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path).map(|meta| meta.modified().unwrap_or(SystemTime::UNIX_EPOCH))
}

impl MemViewApp {
    /// Load a raw memory image from disk. The bytes start at address 0 and
    /// become the clean baseline; use re-addressing to move them.
    pub(crate) fn load_file(&mut self, path: &Path) {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to open file");
                self.error = Some(err.to_string());
                return;
            }
        };

        let last_modified = match get_last_modified(path) {
            Ok(time) => time,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };

        info!(path = %path.display(), len = data.len(), "file opened");

        self.display.load(0, data);
        self.display.clear_highlights();
        self.search.clear();
        self.file = Some(OpenFile {
            path: PathBuf::from(path),
            name: path.file_name().map_or_else(
                || "Untitled".to_string(),
                |n| n.to_string_lossy().into_owned(),
            ),
            last_modified,
        });
    }

    /// Read the open file again as a new snapshot at the same starting address.
    /// Bytes that differ from the previous snapshot are marked as changed.
    pub(crate) fn reload_file(&mut self) {
        let Some(file) = &self.file else {
            return;
        };
        let path = file.path.clone();

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };
        let last_modified = match get_last_modified(&path) {
            Ok(time) => time,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };

        info!(path = %path.display(), len = data.len(), "file reloaded");

        let start = self.display.starting_address();
        self.display.set_new_offset(start, data);
        if let Some(file) = &mut self.file {
            file.last_modified = last_modified;
        }
        self.search.redo();
    }

    pub(crate) fn close_file(&mut self) {
        if let Some(file) = self.file.take() {
            info!(path = %file.path.display(), "file closed");
        }
        self.display.load(0, Vec::new());
        self.display.clear_highlights();
        self.search.clear();
    }

    /// Whether the file on disk is newer than the bytes shown
    pub(crate) fn file_changed_on_disk(&self) -> bool {
        self.file.as_ref().is_some_and(|file| {
            get_last_modified(&file.path).is_ok_and(|time| time != file.last_modified)
        })
    }
}
