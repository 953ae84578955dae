use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A node of the album hierarchy. `path` is the unique key; nesting is
/// expressed only through `/` separated path segments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub path: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub accesses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_amount: Option<u32>,
}

impl Album {
    pub fn new(path: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            text: None,
            order: None,
            accesses: Vec::new(),
            files_amount: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
}

/// A media file as the gallery shows it. `file_type` and `datetime` are not
/// sent by the backend; they are derived from the filename on load.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub filename: String,
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default)]
    pub datetime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub accesses: Vec<String>,
}

/// File as delivered by `GET /get/...`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    pub filename: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub accesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub accesses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_edit_access: Option<bool>,
}

/// One render group: an album and the files shown under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumWithFiles {
    pub album: Album,
    pub files: Vec<File>,
}

/// Inclusive bound pair over the `YYYYMMDD_HHMMSS` datetime of a file.
/// Both bounds compare by prefix, an empty bound is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }

    pub fn contains(&self, datetime: &str) -> bool {
        let prefix = |len: usize| datetime.get(..len).unwrap_or(datetime);

        (self.from.is_empty() || prefix(self.from.len()) >= self.from.as_str())
            && (self.to.is_empty() || prefix(self.to.len()) <= self.to.as_str())
    }
}

/// A single field of a partial update. `Keep` leaves the target alone and is
/// left out of the JSON body, `Set` overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    pub fn is_set(&self) -> bool {
        !self.is_keep()
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Patch::Keep => None,
            Patch::Set(value) => Some(value),
        }
    }

    /// `self` wins where it is set, `older` fills the rest.
    pub fn or(self, older: Patch<T>) -> Patch<T> {
        match self {
            Patch::Keep => older,
            set => set,
        }
    }
}

impl<T: Clone> Patch<T> {
    pub fn apply_to(&self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value.clone();
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Keep, Patch::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Keep => serializer.serialize_none(),
            Patch::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemovedAlbum {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemovedFile {
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Before,
    After,
    In,
}

/// New album placed next to (or inside) an existing one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedAlbum {
    pub path_part: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub related_path: String,
    pub relation: Relation,
}

impl AddedAlbum {
    /// Full path of the new album: nested under the related album for `In`,
    /// its sibling otherwise.
    pub fn path(&self) -> String {
        let parent = match self.relation {
            Relation::In => Some(self.related_path.as_str()),
            Relation::Before | Relation::After => {
                self.related_path.rsplit_once('/').map(|(parent, _)| parent)
            }
        };

        match parent {
            Some(parent) if !parent.is_empty() => format!("{}/{}", parent, self.path_part),
            _ => self.path_part.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedAlbum {
    pub path: String,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub new_path: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub text: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub order: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub accesses: Patch<Vec<String>>,
}

impl UpdatedAlbum {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    /// Path the album has once this update is applied.
    pub fn effective_path(&self) -> &str {
        self.new_path.as_option().map_or(self.path.as_str(), String::as_str)
    }

    /// True when at least one field besides the key is set.
    pub fn has_changes(&self) -> bool {
        self.new_path.is_set()
            || self.title.is_set()
            || self.text.is_set()
            || self.order.is_set()
            || self.accesses.is_set()
    }

    /// Overlay `newer` on top of this entry. The key (`path`) never moves.
    pub fn merge(&mut self, newer: UpdatedAlbum) {
        self.new_path = newer.new_path.or(std::mem::take(&mut self.new_path));
        self.title = newer.title.or(std::mem::take(&mut self.title));
        self.text = newer.text.or(std::mem::take(&mut self.text));
        self.order = newer.order.or(std::mem::take(&mut self.order));
        self.accesses = newer.accesses.or(std::mem::take(&mut self.accesses));
    }

    pub fn apply_to(&self, album: &mut Album) {
        self.new_path.apply_to(&mut album.path);
        self.title.apply_to(&mut album.title);
        if let Patch::Set(text) = &self.text {
            album.text = Some(text.clone());
        }
        if let Patch::Set(order) = &self.order {
            album.order = Some(*order);
        }
        self.accesses.apply_to(&mut album.accesses);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedFile {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub path: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub text: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub accesses: Patch<Vec<String>>,
}

impl UpdatedFile {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            ..Default::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.path.is_set()
            || self.description.is_set()
            || self.text.is_set()
            || self.accesses.is_set()
    }

    pub fn merge(&mut self, newer: UpdatedFile) {
        self.path = newer.path.or(std::mem::take(&mut self.path));
        self.description = newer.description.or(std::mem::take(&mut self.description));
        self.text = newer.text.or(std::mem::take(&mut self.text));
        self.accesses = newer.accesses.or(std::mem::take(&mut self.accesses));
    }

    pub fn apply_to(&self, file: &mut File) {
        self.path.apply_to(&mut file.path);
        if let Patch::Set(description) = &self.description {
            file.description = Some(description.clone());
        }
        if let Patch::Set(text) = &self.text {
            file.text = Some(text.clone());
        }
        self.accesses.apply_to(&mut file.accesses);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Removals {
    #[serde(default)]
    pub albums: Vec<RemovedAlbum>,
    #[serde(default)]
    pub files: Vec<RemovedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Additions {
    #[serde(default)]
    pub albums: Vec<AddedAlbum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Updates {
    #[serde(default)]
    pub albums: Vec<UpdatedAlbum>,
    #[serde(default)]
    pub files: Vec<UpdatedFile>,
}

/// The pending-change queue, in the shape `POST /edit` expects.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Changes {
    #[serde(default)]
    pub remove: Removals,
    #[serde(default)]
    pub add: Additions,
    #[serde(default)]
    pub update: Updates,
}

impl Changes {
    pub fn len(&self) -> usize {
        self.remove.albums.len()
            + self.remove.files.len()
            + self.add.albums.len()
            + self.update.albums.len()
            + self.update.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.remove.albums.clear();
        self.remove.files.clear();
        self.add.albums.clear();
        self.update.albums.clear();
        self.update.files.clear();
    }
}
