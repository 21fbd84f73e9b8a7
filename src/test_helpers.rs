//! Shared test utilities for the gallery-export test suite.
//!
//! Provides record constructors, an in-code sample gallery, and lookup
//! helpers that panic with a clear message on a miss.
//!
//! # Sample Gallery
//!
//! ```text
//! Gallery (0, root)     art: Sketch (13)
//! ├── Vacation (1)      art: Beach (10)
//! │   └── Beach (4)     art: Dunes (11)
//! ├── Zoo (2)           art: Lion (12)
//! │   └── Misc (5)
//! └── Art (3)
//!     └── Misc (6)
//! ```
//!
//! Albums are stored in the order 0..=6, so input order of the root's
//! children is Vacation, Zoo, Art.

use crate::types::{Album, ArtItem, EntityId, Gallery, Owner};

// =========================================================================
// Constructors
// =========================================================================

pub fn owner() -> Owner {
    Owner {
        username: "matt".to_string(),
        fullname: "Matt Example".to_string(),
        email: "matt@example.org".to_string(),
    }
}

pub fn album(id: EntityId, title: &str, filename: Option<&str>, parent_id: EntityId) -> Album {
    Album {
        id,
        title: title.to_string(),
        owner: owner(),
        filename: filename.map(str::to_string),
        parent_id,
    }
}

pub fn art(id: EntityId, title: &str, filename: &str, parent_id: EntityId) -> ArtItem {
    ArtItem {
        id,
        title: title.to_string(),
        description: None,
        summary: None,
        owner: owner(),
        filename: filename.to_string(),
        mimetype: "image/jpeg".to_string(),
        filesize: 1024,
        parent_id,
    }
}

pub fn sample_gallery() -> Gallery {
    let mut beach = art(10, "Beach", "beach.jpg", 1);
    beach.summary = Some("Sand and sea".to_string());

    let mut dunes = art(11, "Dunes", "dunes.png", 4);
    dunes.summary = Some(String::new());
    dunes.description = Some("A windy day".to_string());
    dunes.mimetype = "image/png".to_string();

    Gallery {
        albums: vec![
            album(0, "Gallery", None, 0),
            album(1, "Vacation", Some("vacation"), 0),
            album(2, "Zoo", Some("zoo"), 0),
            album(3, "Art", Some("art"), 0),
            album(4, "Beach", Some("beach"), 1),
            album(5, "Misc", Some("misc"), 2),
            album(6, "Misc", Some("misc"), 3),
        ],
        art: vec![
            beach,
            dunes,
            art(12, "Lion", "lion.jpg", 2),
            art(13, "Sketch", "sketch.gif", 0),
        ],
    }
}

// =========================================================================
// Lookups
// =========================================================================

/// Find an art item by title. Panics if not found.
pub fn find_art<'a>(gallery: &'a Gallery, title: &str) -> &'a ArtItem {
    gallery
        .art
        .iter()
        .find(|i| i.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = gallery.art.iter().map(|i| i.title.as_str()).collect();
            panic!("art '{title}' not found. Available: {titles:?}")
        })
}

/// Find an album by id. Panics if not found.
pub fn find_album(gallery: &Gallery, id: EntityId) -> &Album {
    gallery
        .albums
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<EntityId> = gallery.albums.iter().map(|a| a.id).collect();
            panic!("album {id} not found. Available: {ids:?}")
        })
}
