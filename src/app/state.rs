use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, error};

use crate::api::{HomeMode, LoadQuery, LoadResponse};
use crate::error::GalleryError;
use crate::gallery::mapper::{map_files_dto_to_files, unique_albums, unique_files};
use crate::gallery::paths::{self, Link};
use crate::gallery::{
    albums_with_files_to_show, apply_changes, Album, AlbumWithFiles, Changes, DateRange,
    Effective, File, User,
};

/// Everything the gallery keeps between events: the loaded snapshot, the
/// pending-change queue, view parameters and session flags.
///
/// All mutation goes through `&mut self` methods; the effective data is
/// derived on demand and never stored.
#[derive(Debug, Clone)]
pub struct GalleryStore {
    pub current_path: String,
    pub date_ranges: Option<Vec<DateRange>>,
    pub token: String,
    pub token_expires_at: u64, // ms since epoch, 0 = none

    pub is_api_loading: bool,
    pub is_api_logining: bool,

    pub all_albums: Vec<Album>,
    pub all_files: Vec<File>,
    pub loaded_paths: Vec<String>,
    pub user: Option<User>,

    // Edit mode
    pub is_edit_mode_enabled: bool,
    pub selected_files: Vec<String>,
    pub changes: Changes,
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: f64,
}

/// Expiry (ms since epoch) from the payload segment of a JWT.
pub fn token_expires_at(token: &str) -> Result<u64, GalleryError> {
    let malformed = || GalleryError::MalformedToken(token.to_string());

    let payload = token.split('.').nth(1).ok_or_else(malformed)?;
    let payload = payload.trim_end_matches('=');
    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| malformed())?;
    let claims: TokenClaims = serde_json::from_slice(&decoded).map_err(|_| malformed())?;

    Ok((claims.exp * 1000.0) as u64)
}

impl GalleryStore {
    pub fn new() -> Self {
        Self {
            current_path: String::new(),
            date_ranges: None,
            token: String::new(),
            token_expires_at: 0,
            is_api_loading: false,
            is_api_logining: true,
            all_albums: Vec::new(),
            all_files: Vec::new(),
            loaded_paths: Vec::new(),
            user: None,
            is_edit_mode_enabled: false,
            selected_files: Vec::new(),
            changes: Changes::default(),
        }
    }

    /// Take the view parameters decoded from the location. A token that
    /// cannot be decoded is dropped: the view continues without a session.
    pub fn set_showing_properties(
        &mut self,
        current_path: &str,
        date_ranges: Option<Vec<DateRange>>,
        token: &str,
    ) {
        self.current_path = current_path.trim_end_matches(paths::SEPARATOR).to_string();
        self.date_ranges = date_ranges;

        if token.is_empty() {
            self.token.clear();
            self.token_expires_at = 0;
            return;
        }

        match token_expires_at(token) {
            Ok(expires_at) => {
                self.token = token.to_string();
                self.token_expires_at = expires_at;
            }
            Err(err) => {
                error!("{}", err);
                self.token.clear();
                self.token_expires_at = 0;
            }
        }
    }

    pub fn is_showing_by_date(&self) -> bool {
        self.date_ranges.is_some()
    }

    pub fn switch_edit_mode(&mut self, enabled: Option<bool>) {
        self.is_edit_mode_enabled = enabled.unwrap_or(!self.is_edit_mode_enabled);
    }

    pub fn add_selected_file(&mut self, filename: &str) {
        if !self.selected_files.iter().any(|selected| selected == filename) {
            self.selected_files.push(filename.to_string());
        }
    }

    /// `None` clears the whole selection.
    pub fn remove_selected_file(&mut self, filename: Option<&str>) {
        match filename {
            Some(filename) => self.selected_files.retain(|selected| selected != filename),
            None => self.selected_files.clear(),
        }
    }

    pub fn effective(&self) -> Effective {
        apply_changes(&self.all_albums, &self.all_files, &self.changes)
    }

    pub fn albums_with_files_to_show(&self) -> Vec<AlbumWithFiles> {
        let effective = self.effective();
        albums_with_files_to_show(
            &effective.albums,
            &effective.files,
            &self.current_path,
            self.date_ranges.as_deref(),
        )
    }

    pub fn links(&self, album_path: &str, is_album_title: bool) -> Vec<Link> {
        let effective = self.effective();
        paths::get_links(album_path, &self.current_path, &effective.albums, is_album_title)
    }

    pub fn path_with_date_ranges(&self) -> String {
        paths::path_with_date_ranges(&self.current_path, self.date_ranges.as_deref())
    }

    pub fn should_load(&self) -> bool {
        paths::should_load(&self.loaded_paths, &self.current_path, self.date_ranges.as_deref())
    }

    /// Request for the current view. Home in date mode asks for everything,
    /// plain home only for the home albums; deeper pages also ask for the
    /// home albums when nothing is loaded yet or everything is reloaded.
    pub fn load_query(&self, is_replace: bool) -> LoadQuery {
        let home = if self.is_showing_by_date() && self.current_path.is_empty() {
            None
        } else if self.current_path.is_empty() {
            Some(HomeMode::Only)
        } else if self.all_albums.is_empty() || is_replace {
            Some(HomeMode::Include)
        } else {
            None
        };

        LoadQuery {
            path: self.current_path.clone(),
            home,
            token: self.token.clone(),
            date_ranges: self
                .date_ranges
                .as_deref()
                .map(paths::date_ranges_to_parameter)
                .unwrap_or_default(),
        }
    }

    /// Marks a load as in flight. `false` means one already is and the new
    /// request must not be sent.
    pub fn load_pending(&mut self) -> bool {
        if self.is_api_loading {
            return false;
        }
        self.is_api_loading = true;
        true
    }

    pub fn load_rejected(&mut self) {
        self.is_api_loading = false;
        self.is_api_logining = false;
    }

    pub fn load_fulfilled(&mut self, is_replace: bool, response: LoadResponse) {
        self.is_api_loading = false;
        self.is_api_logining = false;
        self.user = response.user;

        if is_replace {
            self.loaded_paths.clear();
            self.all_albums.clear();
            self.all_files.clear();
        }

        let loaded_path = self.path_with_date_ranges();
        if self.loaded_paths.contains(&loaded_path) {
            debug!("{:?} already loaded", loaded_path);
            return;
        }
        if !self.loaded_paths.iter().any(String::is_empty) {
            self.loaded_paths.push(String::new());
        }
        if !loaded_path.is_empty() {
            self.loaded_paths.push(loaded_path);
        }

        self.all_albums = unique_albums(
            std::mem::take(&mut self.all_albums)
                .into_iter()
                .chain(response.albums),
        );

        let mut files = unique_files(
            std::mem::take(&mut self.all_files)
                .into_iter()
                .chain(map_files_dto_to_files(response.files)),
        );
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        self.all_files = files;
    }

    pub fn login_pending(&mut self) {
        self.is_api_logining = true;
    }

    pub fn login_rejected(&mut self) {
        self.is_api_logining = false;
    }

    pub fn login_fulfilled(&mut self, user: Option<User>) {
        self.user = user;
        self.is_api_logining = false;
    }

    pub fn logout_pending(&mut self) {
        self.is_api_logining = true;
    }

    pub fn logout_rejected(&mut self) {
        self.is_api_logining = false;
    }

    pub fn logout_fulfilled(&mut self) {
        self.user = None;
        self.is_api_logining = false;
    }

    /// A successful commit empties the queue and the selection.
    pub fn edit_fulfilled(&mut self, is_success: bool) {
        if is_success {
            self.reset_updated();
        }
    }
}
