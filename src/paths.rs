//! Relative path construction from an album's ancestor chain.
//!
//! Two path flavours exist:
//!
//! - **Directory paths** join `filename-id` segments (`vacation-1/beach-4`).
//!   They lay out the generated site on disk, where two sibling albums may
//!   share a filename and the id keeps them apart.
//! - **Relative paths** join plain filenames (`vacation/beach`). They mirror
//!   the gallery's own layout and appear in JSON `filepath` fields and in
//!   asset URLs.
//!
//! Every function takes a chain as returned by
//! [`GalleryTree::ancestor_chain`](crate::tree::GalleryTree::ancestor_chain):
//! root-first, root itself excluded.

use crate::types::{Album, ArtItem};

/// Whether an album filename can stand as one directory level.
///
/// Rejects the empty name, `.` and `..`, and anything containing a path
/// separator or NUL, so a directory path always has one segment per album.
pub fn is_valid_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// `filename-id` segment identifying an album's directory in the site.
pub fn directory_segment(album: &Album) -> String {
    format!("{}-{}", album.dir_name(), album.id)
}

/// Site directory for the last album of `chain`, relative to the html root.
///
/// The empty chain (the root album) yields the empty string.
pub fn album_directory_path(chain: &[&Album]) -> String {
    chain
        .iter()
        .map(|a| directory_segment(a))
        .collect::<Vec<_>>()
        .join("/")
}

/// Plain filename path of the last album of `chain`.
pub fn album_relative_path(chain: &[&Album]) -> String {
    chain
        .iter()
        .map(|a| a.dir_name())
        .collect::<Vec<_>>()
        .join("/")
}

/// Path of an art item: its album's relative path plus its own filename.
///
/// Never empty: the item's filename is always the final segment.
pub fn art_relative_path(chain: &[&Album], item: &ArtItem) -> String {
    let dir = album_relative_path(chain);
    if dir.is_empty() {
        item.filename.clone()
    } else {
        format!("{}/{}", dir, item.filename)
    }
}

/// `../` repeated `depth` times: the way back to the html root from a page
/// `depth` directories below it.
pub fn relative_root(depth: usize) -> String {
    "../".repeat(depth)
}

/// URL of an asset under a configured root (`art_dir`, `thumbs_dir`).
///
/// Relative roots are resolved against the html root, so pages nested
/// `depth` directories deep get the matching `../` prefix. Absolute roots
/// (`/media`, `https://cdn.example.org`) are used as given.
pub fn asset_url(root: &str, depth: usize, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    let is_absolute = root.starts_with('/') || root.contains("://");
    match (root.is_empty(), is_absolute) {
        (true, _) => format!("{}{}", relative_root(depth), relative),
        (false, true) => format!("{}/{}", root, relative),
        (false, false) => format!("{}{}/{}", relative_root(depth), root, relative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{album, art};

    #[test]
    fn valid_segments() {
        assert!(is_valid_segment("beach"));
        assert!(is_valid_segment("caf\u{e9}"));
        assert!(is_valid_segment("..hidden"));
    }

    #[test]
    fn invalid_segments() {
        for name in ["", ".", "..", "a/b", "../../escape", "a\\b", "a\0b"] {
            assert!(!is_valid_segment(name), "{name:?} accepted");
        }
    }

    #[test]
    fn directory_segment_appends_id() {
        let a = album(4, "Beach", Some("beach"), 1);
        assert_eq!(directory_segment(&a), "beach-4");
    }

    #[test]
    fn directory_path_joins_segments() {
        let parent = album(1, "Vacation", Some("vacation"), 0);
        let child = album(4, "Beach", Some("beach"), 1);
        assert_eq!(album_directory_path(&[&parent, &child]), "vacation-1/beach-4");
    }

    #[test]
    fn directory_path_of_root_is_empty() {
        assert_eq!(album_directory_path(&[]), "");
    }

    #[test]
    fn same_filename_gets_distinct_directories() {
        let a = album(2, "Misc", Some("misc"), 0);
        let b = album(3, "Misc", Some("misc"), 0);
        assert_ne!(album_directory_path(&[&a]), album_directory_path(&[&b]));
    }

    #[test]
    fn relative_path_has_no_ids() {
        let parent = album(1, "Vacation", Some("vacation"), 0);
        let child = album(4, "Beach", Some("beach"), 1);
        assert_eq!(album_relative_path(&[&parent, &child]), "vacation/beach");
    }

    #[test]
    fn art_path_ends_with_filename() {
        let parent = album(1, "Vacation", Some("vacation"), 0);
        let item = art(10, "Beach", "beach.jpg", 1);
        assert_eq!(art_relative_path(&[&parent], &item), "vacation/beach.jpg");
    }

    #[test]
    fn art_path_without_albums_is_filename() {
        let item = art(10, "Beach", "beach.jpg", 0);
        assert_eq!(art_relative_path(&[], &item), "beach.jpg");
    }

    #[test]
    fn relative_root_repeats() {
        assert_eq!(relative_root(0), "");
        assert_eq!(relative_root(2), "../../");
    }

    #[test]
    fn asset_url_relative_root() {
        assert_eq!(asset_url("thumbs", 0, "a/b.jpg"), "thumbs/a/b.jpg");
        assert_eq!(asset_url("thumbs/", 2, "a/b.jpg"), "../../thumbs/a/b.jpg");
    }

    #[test]
    fn asset_url_absolute_root() {
        assert_eq!(asset_url("/art", 3, "a/b.jpg"), "/art/a/b.jpg");
        assert_eq!(
            asset_url("https://cdn.example.org/art", 1, "b.jpg"),
            "https://cdn.example.org/art/b.jpg"
        );
    }

    #[test]
    fn asset_url_empty_root() {
        assert_eq!(asset_url("", 1, "b.jpg"), "../b.jpg");
    }
}
