//! Applies a pending change-set to a base snapshot.
//!
//! Steps run in a fixed order (remove, add, update albums, update files,
//! sort); each sees the output of the previous one. Steps with nothing to do
//! pass their input through borrowed.

use std::borrow::Cow;
use std::collections::HashSet;

use super::sort::{sort_albums, sort_files};
use super::types::{
    AddedAlbum, Album, Changes, File, Relation, RemovedAlbum, RemovedFile, UpdatedAlbum,
    UpdatedFile,
};

/// Base data with every pending change applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Effective {
    pub albums: Vec<Album>,
    pub files: Vec<File>,
}

fn remove_albums<'a>(albums: &'a [Album], removed: &[RemovedAlbum]) -> Cow<'a, [Album]> {
    if removed.is_empty() {
        return Cow::Borrowed(albums);
    }

    let removed: HashSet<&str> = removed.iter().map(|album| album.path.as_str()).collect();
    albums
        .iter()
        .filter(|album| !removed.contains(album.path.as_str()))
        .cloned()
        .collect()
}

fn remove_files<'a>(files: &'a [File], removed: &[RemovedFile]) -> Cow<'a, [File]> {
    if removed.is_empty() {
        return Cow::Borrowed(files);
    }

    let removed: HashSet<&str> = removed.iter().map(|file| file.filename.as_str()).collect();
    files
        .iter()
        .filter(|file| !removed.contains(file.filename.as_str()))
        .cloned()
        .collect()
}

fn add_albums<'a>(albums: Cow<'a, [Album]>, added: &[AddedAlbum]) -> Cow<'a, [Album]> {
    if added.is_empty() {
        return albums;
    }

    let mut albums = albums.into_owned();
    for added_album in added {
        let path = added_album.path();
        if albums.iter().any(|album| album.path == path) {
            continue;
        }

        // A stale insertion target is skipped, not an error.
        let Some(related) = albums
            .iter()
            .position(|album| album.path == added_album.related_path)
        else {
            continue;
        };

        let index = match added_album.relation {
            Relation::Before => related,
            Relation::After | Relation::In => related + 1,
        };
        albums.insert(
            index,
            Album {
                text: Some(added_album.text.clone()).filter(|text| !text.is_empty()),
                files_amount: Some(0),
                ..Album::new(&path, &added_album.title)
            },
        );
    }
    Cow::Owned(albums)
}

fn update_albums<'a>(albums: Cow<'a, [Album]>, updated: &[UpdatedAlbum]) -> Cow<'a, [Album]> {
    if updated.is_empty() {
        return albums;
    }

    let mut albums = albums.into_owned();
    for album in albums.iter_mut() {
        if let Some(update) = updated.iter().find(|update| update.path == album.path) {
            update.apply_to(album);
        }
    }
    Cow::Owned(albums)
}

fn update_files<'a>(files: Cow<'a, [File]>, updated: &[UpdatedFile]) -> Cow<'a, [File]> {
    if updated.is_empty() {
        return files;
    }

    let mut files = files.into_owned();
    for file in files.iter_mut() {
        if let Some(update) = updated.iter().find(|update| update.filename == file.filename) {
            update.apply_to(file);
        }
    }
    Cow::Owned(files)
}

/// Merge `changes` into the base collections. Inputs are never modified and
/// the result depends only on the three arguments.
pub fn apply_changes(albums: &[Album], files: &[File], changes: &Changes) -> Effective {
    let albums = remove_albums(albums, &changes.remove.albums);
    let files = remove_files(files, &changes.remove.files);

    let albums = add_albums(albums, &changes.add.albums);

    let albums = update_albums(albums, &changes.update.albums);
    let files = update_files(files, &changes.update.files);

    let albums = sort_albums(albums.into_owned());
    let files = sort_files(files.into_owned(), &albums);

    Effective { albums, files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::mapper::map_file_dto;
    use crate::gallery::types::{FileDto, Patch};

    fn file(filename: &str, path: &str) -> File {
        map_file_dto(FileDto {
            filename: filename.to_string(),
            path: path.to_string(),
            description: None,
            text: None,
            accesses: Vec::new(),
        })
    }

    fn base() -> (Vec<Album>, Vec<File>) {
        let albums = sort_albums(vec![
            Album::new("a", "A"),
            Album::new("a/b", "B"),
            Album::new("c", "C"),
        ]);
        let files = sort_files(
            vec![
                file("20230101_000000.jpg", "a"),
                file("20230202_000000.jpg", "a/b"),
                file("20230303_000000.jpg", "c"),
            ],
            &albums,
        );
        (albums, files)
    }

    #[test]
    fn test_empty_changes_is_identity() {
        let (albums, files) = base();
        let effective = apply_changes(&albums, &files, &Changes::default());
        assert_eq!(effective.albums, albums);
        assert_eq!(effective.files, files);
    }

    #[test]
    fn test_remove_then_update() {
        let (albums, files) = base();
        let mut changes = Changes::default();
        changes.remove.albums.push(RemovedAlbum { path: "c".to_string() });
        changes.remove.files.push(RemovedFile {
            filename: "20230303_000000.jpg".to_string(),
        });
        let mut update = UpdatedAlbum::new("a");
        update.title = Patch::Set("Renamed".to_string());
        changes.update.albums.push(update);

        let effective = apply_changes(&albums, &files, &changes);
        assert_eq!(effective.albums.len(), 2);
        assert_eq!(effective.albums[0].title, "Renamed");
        assert_eq!(effective.files.len(), 2);
        // base untouched
        assert_eq!(albums.len(), 3);
        assert_eq!(albums[0].title, "A");
    }

    #[test]
    fn test_add_skips_stale_target() {
        let (albums, files) = base();
        let mut changes = Changes::default();
        changes.add.albums.push(AddedAlbum {
            path_part: "new".to_string(),
            title: "New".to_string(),
            text: String::new(),
            related_path: "missing".to_string(),
            relation: Relation::After,
        });
        changes.add.albums.push(AddedAlbum {
            path_part: "d".to_string(),
            title: "D".to_string(),
            text: "about d".to_string(),
            related_path: "a".to_string(),
            relation: Relation::In,
        });

        let effective = apply_changes(&albums, &files, &changes);
        let paths: Vec<&str> = effective.albums.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/d", "c"]);

        let added = &effective.albums[2];
        assert_eq!(added.files_amount, Some(0));
        assert!(added.accesses.is_empty());
        assert_eq!(added.text.as_deref(), Some("about d"));
    }

    #[test]
    fn test_rename_and_move() {
        let (albums, files) = base();
        let mut changes = Changes::default();
        let mut rename = UpdatedAlbum::new("c");
        rename.new_path = Patch::Set("0".to_string());
        changes.update.albums.push(rename);
        let mut move_file = UpdatedFile::new("20230303_000000.jpg");
        move_file.path = Patch::Set("0".to_string());
        changes.update.files.push(move_file);

        let effective = apply_changes(&albums, &files, &changes);
        assert_eq!(effective.albums[0].path, "0");
        assert_eq!(effective.files[0].filename, "20230303_000000.jpg");
        assert_eq!(effective.files[0].path, "0");
    }

    #[test]
    fn test_reapplying_changes_is_stable() {
        let (albums, files) = base();
        let mut changes = Changes::default();
        changes.add.albums.push(AddedAlbum {
            path_part: "e".to_string(),
            title: "E".to_string(),
            text: String::new(),
            related_path: "c".to_string(),
            relation: Relation::Before,
        });
        let mut rename = UpdatedAlbum::new("a/b");
        rename.new_path = Patch::Set("a/bb".to_string());
        changes.update.albums.push(rename);
        changes.remove.files.push(RemovedFile {
            filename: "20230101_000000.jpg".to_string(),
        });

        let once = apply_changes(&albums, &files, &changes);
        let twice = apply_changes(&once.albums, &once.files, &changes);
        assert_eq!(once, twice);
    }
}
