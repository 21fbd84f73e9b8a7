//! Entity model shared by every stage of the export.
//!
//! A data source delivers two flat record sets ([`AlbumRecord`], [`ArtRecord`])
//! with the owner columns inlined. They are converted once into the typed
//! [`Album`] and [`ArtItem`] values held by a [`Gallery`], which is the
//! read-only snapshot every later stage borrows from.
//!
//! Records reject unknown fields instead of silently dropping them, so a
//! snapshot written by a newer schema fails loudly rather than exporting
//! partial data.

use serde::{Deserialize, Serialize};

/// Album and art ids as stored by the gallery database.
pub type EntityId = i64;

/// Parent id carried by the root album.
pub const ROOT_PARENT_ID: EntityId = 0;

/// The user that submitted an album or an art item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub username: String,
    pub fullname: String,
    pub email: String,
}

/// A node in the album hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: EntityId,
    pub title: String,
    pub owner: Owner,
    /// Directory name of the album. Absent only on the root album.
    pub filename: Option<String>,
    pub parent_id: EntityId,
}

impl Album {
    /// True for the album that terminates every ancestor walk.
    pub fn is_root_sentinel(&self) -> bool {
        self.id == ROOT_PARENT_ID || self.filename.is_none()
    }

    /// Directory name, or the empty string for the root.
    pub fn dir_name(&self) -> &str {
        self.filename.as_deref().unwrap_or_default()
    }
}

/// A leaf item (an image or other upload) attached to exactly one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtItem {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub owner: Owner,
    pub filename: String,
    pub mimetype: String,
    pub filesize: i64,
    pub parent_id: EntityId,
}

/// Flat album row as delivered by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(deny_unknown_fields)]
pub struct AlbumRecord {
    pub id: EntityId,
    pub title: String,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub filename: Option<String>,
    pub parent_id: EntityId,
}

/// Flat art row as delivered by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(deny_unknown_fields)]
pub struct ArtRecord {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub filename: String,
    pub mimetype: String,
    pub filesize: i64,
    pub parent_id: EntityId,
}

impl From<AlbumRecord> for Album {
    fn from(r: AlbumRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            owner: Owner {
                username: r.username,
                fullname: r.fullname,
                email: r.email,
            },
            filename: r.filename,
            parent_id: r.parent_id,
        }
    }
}

impl From<&Album> for AlbumRecord {
    fn from(a: &Album) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            username: a.owner.username.clone(),
            fullname: a.owner.fullname.clone(),
            email: a.owner.email.clone(),
            filename: a.filename.clone(),
            parent_id: a.parent_id,
        }
    }
}

impl From<ArtRecord> for ArtItem {
    fn from(r: ArtRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            summary: r.summary,
            owner: Owner {
                username: r.username,
                fullname: r.fullname,
                email: r.email,
            },
            filename: r.filename,
            mimetype: r.mimetype,
            filesize: r.filesize,
            parent_id: r.parent_id,
        }
    }
}

impl From<&ArtItem> for ArtRecord {
    fn from(a: &ArtItem) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            description: a.description.clone(),
            summary: a.summary.clone(),
            username: a.owner.username.clone(),
            fullname: a.owner.fullname.clone(),
            email: a.owner.email.clone(),
            filename: a.filename.clone(),
            mimetype: a.mimetype.clone(),
            filesize: a.filesize,
            parent_id: a.parent_id,
        }
    }
}

/// Snapshot of both record sets, loaded once per run and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    pub albums: Vec<Album>,
    pub art: Vec<ArtItem>,
}

impl Gallery {
    pub fn from_records(albums: Vec<AlbumRecord>, art: Vec<ArtRecord>) -> Self {
        Self {
            albums: albums.into_iter().map(Album::from).collect(),
            art: art.into_iter().map(ArtItem::from).collect(),
        }
    }
}

/// Treat `None`, empty and whitespace-only text as "no value".
pub fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_sentinel_by_missing_filename() {
        let album = Album {
            id: 7,
            title: "Gallery".into(),
            owner: Owner::default(),
            filename: None,
            parent_id: 0,
        };
        assert!(album.is_root_sentinel());
        assert_eq!(album.dir_name(), "");
    }

    #[test]
    fn root_sentinel_by_zero_id() {
        let album = Album {
            id: 0,
            title: "Gallery".into(),
            owner: Owner::default(),
            filename: Some("gallery".into()),
            parent_id: 0,
        };
        assert!(album.is_root_sentinel());
    }

    #[test]
    fn regular_album_is_not_sentinel() {
        let album = Album {
            id: 3,
            title: "Vacation".into(),
            owner: Owner::default(),
            filename: Some("vacation".into()),
            parent_id: 0,
        };
        assert!(!album.is_root_sentinel());
        assert_eq!(album.dir_name(), "vacation");
    }

    #[test]
    fn album_record_inlines_owner() {
        let record: AlbumRecord = serde_json::from_str(
            r#"{"id":1,"title":"Vacation","username":"matt","fullname":"Matt","email":"m@example.org","filename":"vacation","parent_id":0}"#,
        )
        .unwrap();
        let album = Album::from(record);
        assert_eq!(album.owner.username, "matt");
        assert_eq!(album.filename.as_deref(), Some("vacation"));
    }

    #[test]
    fn album_record_rejects_unknown_fields() {
        let result: Result<AlbumRecord, _> = serde_json::from_str(
            r#"{"id":1,"title":"T","username":"u","fullname":"f","email":"e","filename":null,"parent_id":0,"hidden":true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn art_record_defaults_optional_text() {
        let record: ArtRecord = serde_json::from_str(
            r#"{"id":10,"title":"Beach","username":"u","fullname":"f","email":"e","filename":"beach.jpg","mimetype":"image/jpeg","filesize":2048,"parent_id":1}"#,
        )
        .unwrap();
        assert_eq!(record.summary, None);
        assert_eq!(record.description, None);
    }

    #[test]
    fn art_record_converts_back() {
        let record = ArtRecord {
            id: 10,
            title: "Beach".into(),
            description: Some("Sand".into()),
            summary: None,
            username: "u".into(),
            fullname: "f".into(),
            email: "e".into(),
            filename: "beach.jpg".into(),
            mimetype: "image/jpeg".into(),
            filesize: 2048,
            parent_id: 1,
        };
        let item = ArtItem::from(record.clone());
        assert_eq!(ArtRecord::from(&item), record);
    }

    #[test]
    fn non_empty_filters_blank_text() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some("Sunset")), Some("Sunset"));
    }
}
