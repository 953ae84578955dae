//! Plain-text rendering of a gallery page.

use std::fmt::Write;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::state::GalleryStore;
use crate::gallery::paths::{format_datetime, generate_album_title_by_path, get_links};
use crate::gallery::{albums_with_files_to_show, Album, AlbumWithFiles, FileType};

const NAME_COLUMN: usize = 32;

/// Cut `s` to `max_width` display columns, ending in "…" when cut.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        width += w;
    }
    out + "…"
}

/// `s` padded with spaces to `width` display columns.
pub fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

fn render_group(out: &mut String, store: &GalleryStore, albums: &[Album], group: &AlbumWithFiles) {
    let title: Vec<String> = get_links(&group.album.path, &store.current_path, albums, true)
        .into_iter()
        .map(|link| link.text)
        .collect();
    let title = if title.is_empty() {
        group.album.title.clone()
    } else {
        title.join(" / ")
    };

    let _ = writeln!(out, "== {} ==  ({})", title, group.album.path);
    if let Some(text) = group.album.text.as_deref().filter(|text| !text.is_empty()) {
        let _ = writeln!(out, "   {}", text);
    }

    for file in &group.files {
        let marker = if store.selected_files.contains(&file.filename) {
            '*'
        } else {
            ' '
        };
        let name = pad(&truncate(&file.filename, NAME_COLUMN), NAME_COLUMN);
        let mut line = format!(
            " {} {}  {}",
            marker,
            name,
            pad(&format_datetime(&file.datetime), 16)
        );
        if file.file_type == FileType::Video {
            line.push_str("  [video]");
        }
        if let Some(description) = file.description.as_deref() {
            line.push_str("  ");
            line.push_str(description);
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

/// The current page: breadcrumbs, status line and one block per group.
pub fn render_page(store: &GalleryStore) -> String {
    let mut out = String::new();

    let effective = store.effective();

    let crumbs: Vec<String> = if store.current_path.is_empty() {
        vec!["Home".to_string()]
    } else {
        let current = effective
            .albums
            .iter()
            .find(|album| album.path == store.current_path)
            .map(|album| album.title.clone())
            .unwrap_or_else(|| generate_album_title_by_path(&store.current_path));
        get_links(&store.current_path, &store.current_path, &effective.albums, false)
            .into_iter()
            .map(|link| link.text)
            .chain(std::iter::once(current))
            .collect()
    };
    let _ = write!(out, "{}", crumbs.join(" / "));
    if store.is_showing_by_date() {
        out.push_str("  [by date]");
    }
    out.push('\n');

    if store.is_edit_mode_enabled {
        let _ = writeln!(
            out,
            "edit mode: {} pending, {} selected",
            store.changes.len(),
            store.selected_files.len()
        );
    }
    if let Some(user) = &store.user {
        let _ = writeln!(out, "signed in as {}", user.email);
    }

    let groups = albums_with_files_to_show(
        &effective.albums,
        &effective.files,
        &store.current_path,
        store.date_ranges.as_deref(),
    );
    if groups.is_empty() {
        out.push_str("\n(nothing here)\n");
        return out;
    }
    for group in &groups {
        out.push('\n');
        render_group(&mut out, store, &effective.albums, group);
    }
    out
}
