//! JSON document export.
//!
//! Converts the album tree into the two documents consumed by the new
//! gallery:
//!
//! ```text
//! art.json           {"art": [ArtDocument, ...]}        flat, each item lists its albums
//! art_by_album.json  {"albums": [AlbumDocument]}         the root, children nested
//! ```
//!
//! Children keep the order the data source delivered them in. The generated
//! site sorts by title; the documents deliberately do not.
//!
//! Art nested under an album carries no `albums` list, since its position in
//! the tree already says where it lives. The flat listing has no tree, so
//! each entry lists its ancestor albums top-down.
//!
//! Documents are written to a temporary file next to the target and renamed
//! into place, so an interrupted run leaves either the old file or the new
//! one, never a truncated mix.

use crate::paths;
use crate::tree::{GalleryTree, TreeError};
use crate::types::{Album, ArtItem, EntityId, Owner, non_empty};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const ART_FILE: &str = "art.json";
pub const ALBUMS_FILE: &str = "art_by_album.json";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

/// An ancestor album as listed on a flat art entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumRef {
    pub name: String,
    pub dir_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtDocument {
    pub id: EntityId,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub filename: String,
    pub filepath: String,
    pub filesize: i64,
    pub mimetype: String,
    pub owner: Owner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<AlbumRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumDocument {
    pub id: EntityId,
    pub title: String,
    pub filename: Option<String>,
    pub filepath: String,
    pub owner: Owner,
    pub children: Vec<AlbumDocument>,
    pub art: Vec<ArtDocument>,
}

impl AlbumDocument {
    /// Number of albums in this subtree, this one included.
    pub fn album_count(&self) -> usize {
        1 + self.children.iter().map(Self::album_count).sum::<usize>()
    }
}

/// Contents of `art.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ArtCatalog {
    pub art: Vec<ArtDocument>,
}

/// Contents of `art_by_album.json`.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumCatalog {
    pub albums: Vec<AlbumDocument>,
}

/// What [`export_documents`] wrote.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub art_path: PathBuf,
    pub albums_path: PathBuf,
    pub art_count: usize,
    pub album_count: usize,
}

/// Convert an art item; `include_albums` adds its ancestor albums.
pub fn art_to_document(
    item: &ArtItem,
    tree: &GalleryTree,
    include_albums: bool,
) -> Result<ArtDocument, TreeError> {
    let chain = tree.ancestor_chain(item.parent_id)?;
    Ok(art_document(item, &chain, include_albums))
}

fn art_document(item: &ArtItem, chain: &[&Album], include_albums: bool) -> ArtDocument {
    let albums = include_albums.then(|| {
        chain
            .iter()
            .map(|a| AlbumRef {
                name: a.title.clone(),
                dir_name: a.dir_name().to_string(),
            })
            .collect()
    });

    ArtDocument {
        id: item.id,
        title: item.title.clone(),
        summary: non_empty(item.summary.as_deref()).map(str::to_string),
        description: non_empty(item.description.as_deref()).map(str::to_string),
        filename: item.filename.clone(),
        filepath: paths::art_relative_path(chain, item),
        filesize: item.filesize,
        mimetype: item.mimetype.clone(),
        owner: item.owner.clone(),
        albums,
    }
}

/// Convert an album and everything below it.
pub fn album_to_document(album: &Album, tree: &GalleryTree) -> Result<AlbumDocument, TreeError> {
    let chain = tree.ancestor_chain(album.id)?;

    let children = tree
        .children_of(album.id)
        .iter()
        .map(|child| album_to_document(child, tree))
        .collect::<Result<Vec<_>, _>>()?;

    let art = tree
        .art_in(album.id)
        .iter()
        .map(|item| art_document(item, &chain, false))
        .collect();

    Ok(AlbumDocument {
        id: album.id,
        title: album.title.clone(),
        filename: album.filename.clone(),
        filepath: paths::album_relative_path(&chain),
        owner: album.owner.clone(),
        children,
        art,
    })
}

/// Every art item in input order, each with its album list.
pub fn build_art_catalog(tree: &GalleryTree) -> Result<ArtCatalog, TreeError> {
    let art = tree
        .gallery()
        .art
        .iter()
        .map(|item| art_to_document(item, tree, true))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArtCatalog { art })
}

/// The root album document with the whole tree nested below it.
pub fn build_album_catalog(tree: &GalleryTree) -> Result<AlbumCatalog, TreeError> {
    let root = tree.root()?;
    Ok(AlbumCatalog {
        albums: vec![album_to_document(root, tree)?],
    })
}

/// Write `value` as indented UTF-8 JSON, atomically replacing `path`.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), DocumentError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Build both documents and write them into `dir`.
///
/// Both documents are built before either is written, so a tree error
/// leaves the directory untouched.
pub fn export_documents(tree: &GalleryTree, dir: &Path) -> Result<ExportSummary, DocumentError> {
    let art = build_art_catalog(tree)?;
    let albums = build_album_catalog(tree)?;

    let art_path = dir.join(ART_FILE);
    let albums_path = dir.join(ALBUMS_FILE);
    write_json(&art, &art_path)?;
    tracing::info!(path = %art_path.display(), items = art.art.len(), "wrote art document");
    write_json(&albums, &albums_path)?;
    tracing::info!(path = %albums_path.display(), "wrote album document");

    Ok(ExportSummary {
        art_path,
        albums_path,
        art_count: art.art.len(),
        album_count: albums.albums.iter().map(AlbumDocument::album_count).sum(),
    })
}
