//! Pending-change queue operations of the store.
//!
//! Removals and additions are appended as they come. Updates are reduced to
//! the fields that differ from the album or file as currently shown and
//! then merged into the entry already queued for the same entity, so the
//! queue holds at most one update per album and per file.

use tracing::debug;

use super::state::GalleryStore;
use crate::error::GalleryError;
use crate::gallery::paths::{is_this_or_child_path, rebase_path};
use crate::gallery::{
    AddedAlbum, Album, File, Patch, RemovedAlbum, RemovedFile, UpdatedAlbum, UpdatedFile,
};

fn changed<T: PartialEq>(patch: Patch<T>, current: &T) -> Patch<T> {
    match patch {
        Patch::Set(value) if value != *current => Patch::Set(value),
        _ => Patch::Keep,
    }
}

/// The part of `patch` that actually changes `current`. Missing text counts
/// as empty and missing order as 0.
pub fn updated_album_changed_fields(patch: UpdatedAlbum, current: &Album) -> UpdatedAlbum {
    UpdatedAlbum {
        new_path: changed(patch.new_path, &current.path),
        title: changed(patch.title, &current.title),
        text: changed(patch.text, &current.text.clone().unwrap_or_default()),
        order: changed(patch.order, &current.order.unwrap_or(0)),
        accesses: changed(patch.accesses, &current.accesses),
        path: patch.path,
    }
}

pub fn updated_file_changed_fields(patch: UpdatedFile, current: &File) -> UpdatedFile {
    UpdatedFile {
        path: changed(patch.path, &current.path),
        description: changed(patch.description, &current.description.clone().unwrap_or_default()),
        text: changed(patch.text, &current.text.clone().unwrap_or_default()),
        accesses: changed(patch.accesses, &current.accesses),
        filename: patch.filename,
    }
}

impl GalleryStore {
    pub fn add_removed_album(&mut self, removed: RemovedAlbum) {
        self.changes.remove.albums.push(removed);
    }

    pub fn add_removed_file(&mut self, removed: RemovedFile) {
        self.changes.remove.files.push(removed);
    }

    pub fn add_added_album(&mut self, added: AddedAlbum) {
        self.changes.add.albums.push(added);
    }

    /// Queue an album edit. `patch.path` is the album's path as currently
    /// shown, i.e. after earlier pending renames.
    pub fn add_updated_album(&mut self, patch: UpdatedAlbum) -> Result<(), GalleryError> {
        let effective = self.effective();
        let current = effective
            .albums
            .iter()
            .find(|album| album.path == patch.path)
            .ok_or_else(|| GalleryError::StaleAlbum(patch.path.clone()))?;

        let diff = updated_album_changed_fields(patch, current);
        self.queue_album_update(diff);
        Ok(())
    }

    fn queue_album_update(&mut self, diff: UpdatedAlbum) {
        let queued = self
            .changes
            .update
            .albums
            .iter_mut()
            .find(|queued| queued.effective_path() == diff.path);

        match queued {
            Some(queued) => queued.merge(diff),
            None if diff.has_changes() => self.changes.update.albums.push(diff),
            None => debug!("album {:?} unchanged, nothing queued", diff.path),
        }
    }

    /// Rename an album and move everything below it. Every album at or under
    /// `path` gets its new path by prefix substitution, every file in those
    /// albums a path update, all coalesced with entries already queued.
    pub fn new_album_path(&mut self, path: &str, new_path: &str) -> Result<(), GalleryError> {
        if path == new_path {
            return Ok(());
        }

        let effective = self.effective();
        let albums: Vec<&Album> = effective
            .albums
            .iter()
            .filter(|album| is_this_or_child_path(&album.path, path))
            .collect();
        let files: Vec<&File> = effective
            .files
            .iter()
            .filter(|file| is_this_or_child_path(&file.path, path))
            .collect();

        if albums.is_empty() && files.is_empty() {
            return Err(GalleryError::StaleAlbum(path.to_string()));
        }

        for album in albums {
            let Some(moved) = rebase_path(&album.path, path, new_path) else {
                continue;
            };
            let queued = self
                .changes
                .update
                .albums
                .iter_mut()
                .find(|queued| queued.effective_path() == album.path);

            match queued {
                Some(queued) => queued.new_path = Patch::Set(moved),
                None => self.changes.update.albums.push(UpdatedAlbum {
                    new_path: Patch::Set(moved),
                    ..UpdatedAlbum::new(&album.path)
                }),
            }
        }

        for file in files {
            let Some(moved) = rebase_path(&file.path, path, new_path) else {
                continue;
            };
            let queued = self
                .changes
                .update
                .files
                .iter_mut()
                .find(|queued| queued.filename == file.filename);

            match queued {
                Some(queued) => queued.path = Patch::Set(moved),
                None => self.changes.update.files.push(UpdatedFile {
                    path: Patch::Set(moved),
                    ..UpdatedFile::new(&file.filename)
                }),
            }
        }

        Ok(())
    }

    pub fn add_updated_file(&mut self, patch: UpdatedFile) -> Result<(), GalleryError> {
        let effective = self.effective();
        let current = effective
            .files
            .iter()
            .find(|file| file.filename == patch.filename)
            .ok_or_else(|| GalleryError::StaleFile(patch.filename.clone()))?;

        let diff = updated_file_changed_fields(patch, current);
        let queued = self
            .changes
            .update
            .files
            .iter_mut()
            .find(|queued| queued.filename == diff.filename);

        match queued {
            Some(queued) => queued.merge(diff),
            None if diff.has_changes() => self.changes.update.files.push(diff),
            None => debug!("file {:?} unchanged, nothing queued", diff.filename),
        }
        Ok(())
    }

    /// Drop every pending change and the selection.
    pub fn reset_updated(&mut self) {
        self.changes.clear();
        self.selected_files.clear();
    }
}
