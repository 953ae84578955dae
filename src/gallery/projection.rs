//! Turns the effective collection into the groups a page shows.

use std::collections::HashMap;

use super::mapper::{albums_from_files, unique_albums};
use super::paths::{generate_album_title_by_path, is_this_or_child_path, is_top_level_path};
use super::types::{Album, AlbumWithFiles, DateRange, File};

/// Albums visible at `current_path`. The home page shows top-level albums,
/// except in date mode where every album can own a group.
pub fn filter_albums_by_path<'a>(
    albums: &'a [Album],
    current_path: &str,
    is_showing_by_date: bool,
) -> Vec<&'a Album> {
    albums
        .iter()
        .filter(|album| {
            if current_path.is_empty() {
                is_showing_by_date || is_top_level_path(&album.path)
            } else {
                is_this_or_child_path(&album.path, current_path)
            }
        })
        .collect()
}

pub fn filter_files_by_path_and_date_ranges<'a>(
    files: &'a [File],
    current_path: &str,
    date_ranges: Option<&[DateRange]>,
) -> Vec<&'a File> {
    files
        .iter()
        .filter(|file| current_path.is_empty() || is_this_or_child_path(&file.path, current_path))
        .filter(|file| {
            date_ranges.map_or(true, |ranges| {
                ranges.iter().any(|range| range.contains(&file.datetime))
            })
        })
        .collect()
}

/// Groups to render for `current_path`.
///
/// With date ranges, files are walked newest first (by datetime, then
/// filename) and every run of consecutive files from one album becomes its
/// own group. Without, each
/// visible album gets one group holding its own files; the home page lists
/// albums in reverse.
pub fn albums_with_files_to_show(
    all_albums: &[Album],
    all_files: &[File],
    current_path: &str,
    date_ranges: Option<&[DateRange]>,
) -> Vec<AlbumWithFiles> {
    let files = filter_files_by_path_and_date_ranges(all_files, current_path, date_ranges);

    let all_albums_with_generated =
        unique_albums(all_albums.iter().cloned().chain(albums_from_files(all_files)));

    let albums = filter_albums_by_path(
        &all_albums_with_generated,
        current_path,
        date_ranges.is_some(),
    );

    if date_ranges.is_some() {
        let albums_by_path: HashMap<&str, &Album> = albums
            .iter()
            .map(|album| (album.path.as_str(), *album))
            .collect();

        // newest first, whatever album a file belongs to
        let mut files = files;
        files.sort_by(|a, b| {
            b.datetime
                .cmp(&a.datetime)
                .then_with(|| b.filename.cmp(&a.filename))
        });

        let mut groups: Vec<AlbumWithFiles> = Vec::new();
        for file in files {
            if let Some(group) = groups
                .last_mut()
                .filter(|group| group.album.path == file.path)
            {
                group.files.push(file.clone());
                continue;
            }

            let album = albums_by_path
                .get(file.path.as_str())
                .map(|album| (*album).clone())
                .unwrap_or_else(|| Album::new(&file.path, &generate_album_title_by_path(&file.path)));
            groups.push(AlbumWithFiles {
                album,
                files: vec![file.clone()],
            });
        }
        return groups;
    }

    let ordered: Vec<&Album> = if current_path.is_empty() {
        albums.into_iter().rev().collect()
    } else {
        albums
    };

    ordered
        .into_iter()
        .map(|album| AlbumWithFiles {
            album: album.clone(),
            files: files
                .iter()
                .filter(|file| file.path == album.path)
                .map(|file| (*file).clone())
                .collect(),
        })
        .collect()
}
