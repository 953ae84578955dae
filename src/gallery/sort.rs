use std::cmp::Ordering;
use std::collections::HashMap;

use super::paths::SEPARATOR;
use super::types::{Album, File};

/// Segment-wise path order: a parent sorts right before its children.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    a.split(SEPARATOR).cmp(b.split(SEPARATOR))
}

/// Albums by explicit `order` (missing counts as 0), then by path.
pub fn sort_albums(mut albums: Vec<Album>) -> Vec<Album> {
    albums.sort_by(|a, b| {
        a.order
            .unwrap_or(0)
            .cmp(&b.order.unwrap_or(0))
            .then_with(|| compare_paths(&a.path, &b.path))
    });
    albums
}

/// Files grouped in album order, then by capture time and filename. Files
/// whose album is unknown go last, grouped by path.
pub fn sort_files(mut files: Vec<File>, sorted_albums: &[Album]) -> Vec<File> {
    let positions: HashMap<&str, usize> = sorted_albums
        .iter()
        .enumerate()
        .map(|(index, album)| (album.path.as_str(), index))
        .collect();
    let position = |file: &File| positions.get(file.path.as_str()).copied().unwrap_or(usize::MAX);

    files.sort_by(|a, b| {
        position(a)
            .cmp(&position(b))
            .then_with(|| compare_paths(&a.path, &b.path))
            .then_with(|| a.datetime.cmp(&b.datetime))
            .then_with(|| a.filename.cmp(&b.filename))
    });
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::mapper::map_file_dto;
    use crate::gallery::types::FileDto;

    fn album(path: &str, order: Option<i64>) -> Album {
        Album {
            order,
            ..Album::new(path, path)
        }
    }

    fn file(filename: &str, path: &str) -> File {
        map_file_dto(FileDto {
            filename: filename.to_string(),
            path: path.to_string(),
            description: None,
            text: None,
            accesses: Vec::new(),
        })
    }

    #[test]
    fn test_albums_by_order_then_path() {
        let sorted = sort_albums(vec![
            album("ab", None),
            album("a/b", None),
            album("a", None),
            album("z", Some(-1)),
            album("c", Some(2)),
        ]);
        let paths: Vec<&str> = sorted.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, vec!["z", "a", "a/b", "ab", "c"]);
    }

    #[test]
    fn test_files_follow_album_order() {
        let albums = sort_albums(vec![album("b", Some(0)), album("a", Some(1))]);
        let sorted = sort_files(
            vec![
                file("20230102_000000.jpg", "a"),
                file("20230101_000000.jpg", "a"),
                file("20240101_000000.jpg", "b"),
                file("x.jpg", "orphan"),
            ],
            &albums,
        );
        let names: Vec<&str> = sorted.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "20240101_000000.jpg",
                "20230101_000000.jpg",
                "20230102_000000.jpg",
                "x.jpg"
            ]
        );
    }
}
