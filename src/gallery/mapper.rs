use std::collections::HashSet;

use super::paths::generate_album_title_by_path;
use super::types::{Album, File, FileDto, FileType};

const VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "mov"];

pub fn file_type(filename: &str) -> FileType {
    let extension = filename.rsplit('.').next().unwrap_or(filename);
    if VIDEO_EXTENSIONS.contains(&extension) {
        FileType::Video
    } else {
        FileType::Image
    }
}

/// Capture time encoded at the start of a filename.
///
/// `YYYYMMDD_HHMMSS...` gives `YYYYMMDD_HHMMSS`, `YYYYMMDD_...` gives
/// `YYYYMMDD`, anything else an empty string.
pub fn datetime_from_filename(filename: &str) -> String {
    let bytes = filename.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        bytes
            .get(range)
            .is_some_and(|chunk| chunk.iter().all(u8::is_ascii_digit))
    };

    if !digits(0..8) || bytes.get(8) != Some(&b'_') {
        return String::new();
    }

    if digits(9..15) {
        filename[..15].to_string()
    } else {
        filename[..8].to_string()
    }
}

pub fn map_file_dto(dto: FileDto) -> File {
    File {
        file_type: file_type(&dto.filename),
        datetime: datetime_from_filename(&dto.filename),
        filename: dto.filename,
        path: dto.path,
        description: dto.description,
        text: dto.text,
        accesses: dto.accesses,
    }
}

pub fn map_files_dto_to_files(dtos: Vec<FileDto>) -> Vec<File> {
    dtos.into_iter().map(map_file_dto).collect()
}

/// One placeholder album per distinct file path, in first-seen order.
pub fn albums_from_files<'a, I>(files: I) -> Vec<Album>
where
    I: IntoIterator<Item = &'a File>,
{
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| seen.insert(file.path.as_str()))
        .map(|file| Album::new(&file.path, &generate_album_title_by_path(&file.path)))
        .collect()
}

/// First album per path wins, order is kept.
pub fn unique_albums<I>(albums: I) -> Vec<Album>
where
    I: IntoIterator<Item = Album>,
{
    let mut seen = HashSet::new();
    albums
        .into_iter()
        .filter(|album| seen.insert(album.path.clone()))
        .collect()
}

/// First file per filename wins, order is kept.
pub fn unique_files<I>(files: I) -> Vec<File>
where
    I: IntoIterator<Item = File>,
{
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| seen.insert(file.filename.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(filename: &str, path: &str) -> FileDto {
        FileDto {
            filename: filename.to_string(),
            path: path.to_string(),
            description: None,
            text: None,
            accesses: Vec::new(),
        }
    }

    #[test]
    fn test_file_type_by_extension() {
        assert_eq!(file_type("20230615_120000.mp4"), FileType::Video);
        assert_eq!(file_type("clip.mov"), FileType::Video);
        assert_eq!(file_type("20230615_120000.jpg"), FileType::Image);
        assert_eq!(file_type("mp4"), FileType::Video);
        assert_eq!(file_type("CLIP.MP4"), FileType::Image);
    }

    #[test]
    fn test_datetime_from_filename() {
        assert_eq!(datetime_from_filename("20230615_120501.jpg"), "20230615_120501");
        assert_eq!(datetime_from_filename("20230615_120501_2.jpg"), "20230615_120501");
        assert_eq!(datetime_from_filename("20230615_panorama.jpg"), "20230615");
        assert_eq!(datetime_from_filename("IMG_20230615_120501.jpg"), "");
        assert_eq!(datetime_from_filename("20230615.jpg"), "");
        assert_eq!(datetime_from_filename("2023"), "");
    }

    #[test]
    fn test_map_dto_derives_fields() {
        let file = map_file_dto(dto("20230615_120501.mp4", "trips"));
        assert_eq!(file.file_type, FileType::Video);
        assert_eq!(file.datetime, "20230615_120501");
        assert_eq!(file.path, "trips");
    }

    #[test]
    fn test_albums_from_files_dedup() {
        let files = map_files_dto_to_files(vec![
            dto("1.jpg", "trips/alps"),
            dto("2.jpg", "trips/alps"),
            dto("3.jpg", "family"),
        ]);
        let albums = albums_from_files(&files);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].path, "trips/alps");
        assert_eq!(albums[0].title, "[ alps ]");
        assert_eq!(albums[1].title, "[ family ]");
    }

    #[test]
    fn test_unique_keeps_first() {
        let albums = unique_albums(vec![
            Album::new("a", "First"),
            Album::new("b", "B"),
            Album::new("a", "Second"),
        ]);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].title, "First");
    }
}
