//! Album tree reconstruction from the flat album table.
//!
//! The gallery stores its hierarchy as a child→parent column. [`GalleryTree`]
//! indexes a [`Gallery`] snapshot once (id → album, parent → children,
//! album → art) so every later walk is a series of map lookups instead of
//! scans over the whole album list.
//!
//! ## Walking Up
//!
//! [`GalleryTree::ancestor_chain`] follows `parent_id` links upward until it
//! reaches the root sentinel: an album with id 0 or without a filename. The
//! sentinel itself is never part of a chain, so the chain of the root is
//! empty and the chain of a top-level album is that album alone.
//!
//! Gallery dumps often contain orphaned rows. A parent id that resolves to
//! nothing ends the walk early and the partial chain is returned. A parent
//! id seen twice in one walk is a cycle and is an error.
//!
//! ## Walking Down
//!
//! [`GalleryTree::children_of`] keeps input order, which the JSON documents
//! preserve. [`GalleryTree::sorted_children_of`] orders by title for the
//! generated site. The root is never anyone's child, even when it is stored
//! as its own parent (`id == parent_id == 0`).

use crate::paths;
use crate::types::{Album, ArtItem, EntityId, Gallery, ROOT_PARENT_ID};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("no root album (an album with parent_id 0 and no filename)")]
    NoRoot,
    #[error("cycle in the parent chain of album {0}")]
    Cycle(EntityId),
    #[error("album {0} has a filename that is not a single directory name")]
    InvalidFilename(EntityId),
}

/// Indexed, read-only view over a [`Gallery`].
#[derive(Debug)]
pub struct GalleryTree<'a> {
    gallery: &'a Gallery,
    by_id: HashMap<EntityId, &'a Album>,
    children: HashMap<EntityId, Vec<&'a Album>>,
    art: HashMap<EntityId, Vec<&'a ArtItem>>,
}

/// Result of [`GalleryTree::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub root_id: EntityId,
    pub album_count: usize,
    pub art_count: usize,
    /// Albums whose parent id matches no album.
    pub dangling_albums: Vec<EntityId>,
    /// Art items whose parent id matches no album.
    pub orphaned_art: Vec<EntityId>,
    /// Albums not reachable from the root; they are left out of every output.
    pub unreachable_albums: usize,
    pub max_depth: usize,
}

impl<'a> GalleryTree<'a> {
    pub fn new(gallery: &'a Gallery) -> Self {
        let mut by_id = HashMap::with_capacity(gallery.albums.len());
        let mut children: HashMap<EntityId, Vec<&Album>> = HashMap::new();
        for album in &gallery.albums {
            by_id.entry(album.id).or_insert(album);
            if !album.is_root_sentinel() && album.parent_id != album.id {
                children.entry(album.parent_id).or_default().push(album);
            }
        }

        let mut art: HashMap<EntityId, Vec<&ArtItem>> = HashMap::new();
        for item in &gallery.art {
            art.entry(item.parent_id).or_default().push(item);
        }

        Self {
            gallery,
            by_id,
            children,
            art,
        }
    }

    pub fn gallery(&self) -> &'a Gallery {
        self.gallery
    }

    pub fn album(&self, id: EntityId) -> Option<&'a Album> {
        self.by_id.get(&id).copied()
    }

    /// The album with parent id 0 that acts as the root sentinel.
    pub fn root(&self) -> Result<&'a Album, TreeError> {
        self.gallery
            .albums
            .iter()
            .find(|a| a.parent_id == ROOT_PARENT_ID && a.is_root_sentinel())
            .ok_or(TreeError::NoRoot)
    }

    /// Albums from the top-most ancestor down to `start_id`'s album,
    /// root excluded.
    ///
    /// Called with an art item's `parent_id`, this is the item's album chain.
    pub fn ancestor_chain(&self, start_id: EntityId) -> Result<Vec<&'a Album>, TreeError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = start_id;

        loop {
            let Some(album) = self.album(current) else {
                if current != ROOT_PARENT_ID {
                    tracing::warn!(
                        album_id = current,
                        start_id,
                        "parent album not found, using partial chain"
                    );
                }
                break;
            };
            if album.is_root_sentinel() {
                break;
            }
            if !seen.insert(album.id) {
                return Err(TreeError::Cycle(start_id));
            }
            chain.push(album);
            current = album.parent_id;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Ancestors of an album, without the album itself.
    pub fn strict_ancestors(&self, album_id: EntityId) -> Result<Vec<&'a Album>, TreeError> {
        let mut chain = self.ancestor_chain(album_id)?;
        if chain.last().is_some_and(|a| a.id == album_id) {
            chain.pop();
        }
        Ok(chain)
    }

    /// Direct child albums in input order.
    pub fn children_of(&self, album_id: EntityId) -> &[&'a Album] {
        self.children
            .get(&album_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Direct child albums ordered by title (case-sensitive, ascending).
    pub fn sorted_children_of(&self, album_id: EntityId) -> Vec<&'a Album> {
        let mut children = self.children_of(album_id).to_vec();
        children.sort_by(|a, b| a.title.cmp(&b.title));
        children
    }

    /// Art items attached directly to an album, in input order.
    pub fn art_in(&self, album_id: EntityId) -> &[&'a ArtItem] {
        self.art
            .get(&album_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Site directory of an album relative to the html root (`a-1/b-4`).
    ///
    /// Every album on the chain must have a filename that is one plain path
    /// segment; otherwise the directory could leave the html root.
    pub fn directory_path(&self, album_id: EntityId) -> Result<String, TreeError> {
        let chain = self.ancestor_chain(album_id)?;
        if let Some(bad) = chain.iter().find(|a| !paths::is_valid_segment(a.dir_name())) {
            return Err(TreeError::InvalidFilename(bad.id));
        }
        Ok(paths::album_directory_path(&chain))
    }

    /// Resolve the root and every chain, and collect referential problems.
    ///
    /// A missing root, a cycle or an unusable album filename anywhere is an
    /// error; dangling references and unreachable albums are only reported.
    pub fn check(&self) -> Result<IntegrityReport, TreeError> {
        let root = self.root()?;
        let mut max_depth = 0;
        for album in &self.gallery.albums {
            max_depth = max_depth.max(self.ancestor_chain(album.id)?.len());
            self.directory_path(album.id)?;
        }
        for item in &self.gallery.art {
            self.ancestor_chain(item.parent_id)?;
        }

        let dangling_albums = self
            .gallery
            .albums
            .iter()
            .filter(|a| !a.is_root_sentinel())
            .filter(|a| a.parent_id != ROOT_PARENT_ID && self.album(a.parent_id).is_none())
            .map(|a| a.id)
            .collect();
        let orphaned_art = self
            .gallery
            .art
            .iter()
            .filter(|i| self.album(i.parent_id).is_none())
            .map(|i| i.id)
            .collect();

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(album) = stack.pop() {
            reachable += 1;
            stack.extend(self.children_of(album.id));
        }

        Ok(IntegrityReport {
            root_id: root.id,
            album_count: self.gallery.albums.len(),
            art_count: self.gallery.art.len(),
            dangling_albums,
            orphaned_art,
            unreachable_albums: self.gallery.albums.len().saturating_sub(reachable),
            max_depth,
        })
    }
}
