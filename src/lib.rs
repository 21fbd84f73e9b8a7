//! # Gallery Export
//!
//! Exports a legacy photo-gallery database into two JSON documents and a
//! static HTML site that mirrors the album tree.
//!
//! # Architecture
//!
//! ```text
//! 1. Load      database / snapshot  →  Gallery        (two flat record sets)
//! 2. Index     Gallery              →  GalleryTree    (id, children and art lookups)
//! 3a. Export   GalleryTree          →  art.json, art_by_album.json
//! 3b. Site     GalleryTree          →  html/**/index.html
//! ```
//!
//! The gallery stores its hierarchy as a flat child→parent table. Both
//! outputs need the same reconstruction of that tree (ancestor chains,
//! child lists, paths), so it is built once in [`tree`] and shared.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Entity model (`Album`, `ArtItem`, `Owner`) and the raw records sources deliver |
//! | [`source`] | Data sources: Postgres, JSON snapshot |
//! | [`tree`] | Tree resolver: root, ancestor chains, children, integrity check |
//! | [`paths`] | Directory paths (`filename-id`) and gallery paths (`filename`) from a chain |
//! | [`document`] | JSON documents and atomic JSON writing |
//! | [`site`] | HTML site generation using Maud |
//! | [`config`] | `gallery-export.toml` loading, validation, and CSS colors |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Path Flavours
//!
//! Site directories are named `filename-id`, because two albums may share a
//! filename under the same parent and the id keeps their pages apart. JSON
//! `filepath` fields and asset URLs use plain filenames, because they mirror
//! the paths of the gallery itself.
//!
//! ## Two Child Orders
//!
//! The JSON documents keep children in the order the data source returned
//! them. The site sorts them by title so visitors get a stable, readable
//! listing. These are separate on purpose.
//!
//! ## Tolerant Chains, Strict Roots
//!
//! Gallery dumps often contain orphaned rows. A parent id that resolves to
//! nothing ends an ancestor walk early and the partial chain is used. A
//! missing root or a cycle cannot be exported sensibly and aborts the run.

pub mod config;
pub mod document;
pub mod output;
pub mod paths;
pub mod site;
pub mod source;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
