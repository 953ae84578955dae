//! Path helpers for the slash-delimited album hierarchy, plus the string
//! forms of date-range filters.
//!
//! Hierarchy membership is always checked segment-aware: `"a/b"` is inside
//! `"a"`, `"ab"` is not.

use super::types::{Album, DateRange};

pub const SEPARATOR: char = '/';
pub const PARAMETER_DATE_RANGES: &str = "date-ranges";
pub const PARAMETER_FILE: &str = "file";
pub const PARAMETER_TOKEN: &str = "token";

pub fn is_top_level_path(path: &str) -> bool {
    !path.contains(SEPARATOR)
}

/// `item_path` is `required_path` itself or lies below it.
pub fn is_this_or_child_path(item_path: &str, required_path: &str) -> bool {
    match item_path.strip_prefix(required_path) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

pub fn get_level(path: &str) -> usize {
    path.split(SEPARATOR).count()
}

pub fn last_segment(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

/// Move `path` from under `old_root` to under `new_root`. `None` when `path`
/// is not `old_root` or one of its descendants.
pub fn rebase_path(path: &str, old_root: &str, new_root: &str) -> Option<String> {
    if !is_this_or_child_path(path, old_root) {
        return None;
    }
    Some(format!("{}{}", new_root, &path[old_root.len()..]))
}

pub fn generate_album_title_by_path(path: &str) -> String {
    let name = last_segment(path);
    format!("[ {} ]", if name.is_empty() { "untitled" } else { name })
}

/// Link to an album page. `by_date` opens the page in date mode.
pub fn get_link(path: &str, by_date: bool) -> String {
    if by_date {
        format!("/{}?{}=", path, PARAMETER_DATE_RANGES)
    } else {
        format!("/{}", path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Breadcrumbs for `album_path`.
///
/// Navigation mode yields `Home` and every ancestor of the album. Title mode
/// yields the album and its ancestors, minus the levels already covered by
/// `current_path`.
pub fn get_links(
    album_path: &str,
    current_path: &str,
    all_albums: &[Album],
    is_album_title: bool,
) -> Vec<Link> {
    let segments: Vec<&str> = album_path.split(SEPARATOR).collect();

    let links: Vec<Link> = (1..=segments.len())
        .map(|depth| {
            let text_path = segments[..depth].join("/");
            let url = get_link(&text_path, false);
            let text = all_albums
                .iter()
                .find(|album| album.path == text_path)
                .map(|album| album.title.clone())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| generate_album_title_by_path(&url));

            Link { text, url }
        })
        .collect();

    if is_album_title {
        let skip = current_path
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .count();
        return links.into_iter().skip(skip).collect();
    }

    let mut crumbs = vec![Link {
        text: "Home".to_string(),
        url: "/".to_string(),
    }];
    let ancestors = links.len().saturating_sub(1);
    crumbs.extend(links.into_iter().take(ancestors));
    crumbs
}

/// `YYYYMMDD_HHMMSS` (or any prefix of it) as `DD.MM.YYYY HH:MM`.
pub fn format_datetime(datetime: &str) -> String {
    let part = |from: usize, to: usize| datetime.get(from..to.min(datetime.len())).unwrap_or("");

    let year = part(0, 4);
    let month = part(4, 6);
    let date = part(6, 8);
    let hour = part(9, 11);
    let minute = part(11, 13);

    let mut formatted = String::new();
    if !year.is_empty() {
        if !date.is_empty() {
            formatted.push_str(date);
            formatted.push('.');
        }
        if !month.is_empty() {
            formatted.push_str(month);
            formatted.push('.');
        }
        formatted.push_str(year);
    }
    if !hour.is_empty() && !minute.is_empty() {
        formatted.push_str(&format!(" {}:{}", hour, minute));
    }
    formatted
}

/// `"2023-2023,20240101-"` into ranges. An empty string is a single open
/// range (date mode without bounds).
pub fn parse_date_ranges(parameter: &str) -> Vec<DateRange> {
    parameter
        .split(',')
        .map(|range| {
            let mut bounds = range.splitn(2, '-');
            let from = bounds.next().unwrap_or("");
            let to = bounds.next().unwrap_or("");
            DateRange::new(from, to)
        })
        .collect()
}

pub fn date_ranges_to_parameter(date_ranges: &[DateRange]) -> String {
    date_ranges
        .iter()
        .map(|range| {
            if range.is_open() {
                String::new()
            } else {
                format!("{}-{}", range.from, range.to)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Key under which a load of `path` with `date_ranges` is remembered.
/// Unbounded date mode keys like the plain path.
pub fn path_with_date_ranges(path: &str, date_ranges: Option<&[DateRange]>) -> String {
    match date_ranges {
        Some(ranges) if ranges.iter().any(|range| !range.is_open()) => format!(
            "{}?{}={}",
            path,
            PARAMETER_DATE_RANGES,
            date_ranges_to_parameter(ranges)
        ),
        _ => path.to_string(),
    }
}

/// A view needs a request unless a load covering it already happened.
pub fn should_load(
    loaded_paths: &[String],
    current_path: &str,
    date_ranges: Option<&[DateRange]>,
) -> bool {
    let path = path_with_date_ranges(current_path, date_ranges);

    loaded_paths
        .iter()
        .all(|loaded_path| !is_this_or_child_path(&path, loaded_path))
}

/// View parameters carried by a gallery URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub current_path: String,
    pub date_ranges: Option<Vec<DateRange>>,
    pub token: String,
    pub scrolled_to_file: String,
    pub scrolled_to_album: String,
}

/// Split `/route?query#album` into view parameters. Trailing slashes are
/// dropped from the route; query values are taken verbatim.
pub fn parse_location(location: &str) -> Location {
    let (rest, fragment) = location.split_once('#').unwrap_or((location, ""));
    let (route, query) = rest.split_once('?').unwrap_or((rest, ""));

    let mut parsed = Location {
        current_path: route.trim_start_matches(SEPARATOR).trim_end_matches(SEPARATOR).to_string(),
        scrolled_to_album: fragment.to_string(),
        ..Default::default()
    };

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        match name {
            PARAMETER_DATE_RANGES => parsed.date_ranges = Some(parse_date_ranges(value)),
            PARAMETER_FILE => parsed.scrolled_to_file = value.to_string(),
            PARAMETER_TOKEN => parsed.token = value.to_string(),
            _ => {}
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_path_needs_separator() {
        assert!(is_this_or_child_path("a", "a"));
        assert!(is_this_or_child_path("a/b", "a"));
        assert!(is_this_or_child_path("a/b/c", "a/b"));
        assert!(!is_this_or_child_path("ab", "a"));
        assert!(!is_this_or_child_path("a", "a/b"));
        assert!(!is_this_or_child_path("a", ""));
    }

    #[test]
    fn test_rebase_path() {
        assert_eq!(rebase_path("a", "a", "x").as_deref(), Some("x"));
        assert_eq!(rebase_path("a/b/c", "a", "x").as_deref(), Some("x/b/c"));
        assert_eq!(rebase_path("ab/c", "a", "x"), None);
    }

    #[test]
    fn test_generated_titles() {
        assert_eq!(generate_album_title_by_path("trips/alps"), "[ alps ]");
        assert_eq!(generate_album_title_by_path("/"), "[ untitled ]");
        assert_eq!(get_level("trips/alps/day-1"), 3);
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("20230615_120501"), "15.06.2023 12:05");
        assert_eq!(format_datetime("20230615"), "15.06.2023");
        assert_eq!(format_datetime("2023"), "2023");
        assert_eq!(format_datetime(""), "");
    }

    #[test]
    fn test_date_range_parameter() {
        let ranges = parse_date_ranges("2023-2023,20240101-");
        assert_eq!(
            ranges,
            vec![DateRange::new("2023", "2023"), DateRange::new("20240101", "")]
        );
        assert_eq!(date_ranges_to_parameter(&ranges), "2023-2023,20240101-");

        let open = parse_date_ranges("");
        assert_eq!(open, vec![DateRange::default()]);
        assert_eq!(date_ranges_to_parameter(&open), "");
        assert_eq!(path_with_date_ranges("trips", Some(&open)), "trips");
        assert_eq!(
            path_with_date_ranges("trips", Some(&ranges)),
            "trips?date-ranges=2023-2023,20240101-"
        );
    }

    #[test]
    fn test_should_load() {
        let loaded = vec![String::new(), "trips".to_string()];
        assert!(!should_load(&loaded, "trips", None));
        assert!(!should_load(&loaded, "trips/alps", None));
        assert!(should_load(&loaded, "family", None));
        assert!(should_load(&[], "", None));
    }

    #[test]
    fn test_links() {
        let albums = vec![Album::new("trips", "Trips"), Album::new("trips/alps", "Alps")];

        let crumbs = get_links("trips/alps/day-1", "", &albums, false);
        let texts: Vec<&str> = crumbs.iter().map(|link| link.text.as_str()).collect();
        assert_eq!(texts, vec!["Home", "Trips", "Alps"]);
        assert_eq!(crumbs[2].url, "/trips/alps");

        let titles = get_links("trips/alps/day-1", "trips", &albums, true);
        let texts: Vec<&str> = titles.iter().map(|link| link.text.as_str()).collect();
        assert_eq!(texts, vec!["Alps", "[ day-1 ]"]);
    }

    #[test]
    fn test_parse_location() {
        let location = parse_location("/trips/alps/?date-ranges=2023-&file=a.jpg&token=t#day-1");
        assert_eq!(location.current_path, "trips/alps");
        assert_eq!(location.date_ranges, Some(vec![DateRange::new("2023", "")]));
        assert_eq!(location.scrolled_to_file, "a.jpg");
        assert_eq!(location.scrolled_to_album, "day-1");
        assert_eq!(location.token, "t");

        assert_eq!(parse_location("/").date_ranges, None);
    }
}
