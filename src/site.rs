//! Static HTML site generation.
//!
//! Walks the album tree from the root and writes one `index.html` per
//! album. Each page shows:
//!
//! - a breadcrumb trail back to the home page through every ancestor,
//! - the child albums, sorted by title,
//! - a table of the album's own art: thumbnail, full-image link, title,
//!   submitter, and summary/description when present.
//!
//! ## Output Structure
//!
//! ```text
//! html/
//! ├── index.html                       # Root album
//! ├── vacation-1/
//! │   ├── index.html
//! │   └── beach-4/
//! │       └── index.html
//! └── zoo-2/
//!     ├── index.html
//!     └── misc-5/
//!         └── index.html
//! ```
//!
//! Directories are named `filename-id` so sibling albums with the same
//! filename never collide. Every link between pages is relative, so the
//! site works from any base URL or straight off the filesystem.
//!
//! Thumbnails and full images are referenced under the configured
//! `thumbs_dir` and `art_dir` roots, mirroring the gallery's plain
//! filename paths (`thumbs/vacation/beach/dunes.png`). Copying the files
//! there is not part of this tool.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated text is escaped.

use crate::config::{self, ExportConfig};
use crate::paths::{self, asset_url, directory_segment, relative_root};
use crate::tree::{GalleryTree, TreeError};
use crate::types::{Album, ArtItem, EntityId, non_empty};
use maud::{DOCTYPE, Markup, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Everything page rendering needs besides the tree.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub html_dir: PathBuf,
    pub art_dir: String,
    pub thumbs_dir: String,
    /// Home breadcrumb label and page title prefix.
    pub title: String,
    /// Inline stylesheet of every page.
    pub css: String,
}

impl SiteOptions {
    pub fn from_config(config: &ExportConfig) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            html_dir: config.site.html_dir.clone(),
            art_dir: config.site.art_dir.clone(),
            thumbs_dir: config.site.thumbs_dir.clone(),
            title: config.site.title.clone(),
            css: format!("{}\n\n{}", color_css, CSS_STATIC),
        }
    }
}

/// One written page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub album_id: EntityId,
    pub title: String,
    /// Path of the page relative to the html root.
    pub path: String,
    /// Directories below the html root; 0 for the root page.
    pub depth: usize,
    pub child_count: usize,
    pub art_count: usize,
}

/// Pages written by [`build_site`], in depth-first order.
#[derive(Debug, Clone)]
pub struct SiteReport {
    pub html_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
}

impl SiteReport {
    pub fn art_count(&self) -> usize {
        self.pages.iter().map(|p| p.art_count).sum()
    }
}

/// Generate the whole site under `options.html_dir`.
///
/// Sibling subtrees are independent (distinct directories, no shared
/// pages), so they render on the rayon pool. The report keeps depth-first,
/// title-sorted order regardless.
pub fn build_site(tree: &GalleryTree, options: &SiteOptions) -> Result<SiteReport, SiteError> {
    let root = tree.root()?;
    create_dir(&options.html_dir)?;
    let pages = emit_album(tree, root, options)?;
    tracing::info!(pages = pages.len(), html_dir = %options.html_dir.display(), "site generated");
    Ok(SiteReport {
        html_dir: options.html_dir.clone(),
        pages,
    })
}

fn emit_album(
    tree: &GalleryTree,
    album: &Album,
    options: &SiteOptions,
) -> Result<Vec<GeneratedPage>, SiteError> {
    let ancestors = tree.strict_ancestors(album.id)?;
    // Validated: one directory level per album, so the chain length is
    // the page depth below html_dir.
    let dir_path = tree.directory_path(album.id)?;
    let children = tree.sorted_children_of(album.id);
    let art = tree.art_in(album.id);

    // The root's chain is empty, so it lands directly in html_dir.
    let mut chain = ancestors.clone();
    if !album.is_root_sentinel() {
        chain.push(album);
    }

    let page_path = if dir_path.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", dir_path)
    };
    let out_dir = options.html_dir.join(&dir_path);
    create_dir(&out_dir)?;

    let markup = render_album_page(album, &ancestors, &chain, &children, art, options);
    write_page(&options.html_dir.join(&page_path), markup)?;
    tracing::debug!(album_id = album.id, path = %page_path, "wrote page");

    let mut pages = vec![GeneratedPage {
        album_id: album.id,
        title: album.title.clone(),
        path: page_path,
        depth: chain.len(),
        child_count: children.len(),
        art_count: art.len(),
    }];

    let subtrees = children
        .par_iter()
        .map(|child| emit_album(tree, child, options))
        .collect::<Result<Vec<_>, _>>()?;
    pages.extend(subtrees.into_iter().flatten());
    Ok(pages)
}

/// `create_dir_all` succeeds on existing directories, including ones a
/// sibling thread created a moment earlier.
fn create_dir(path: &Path) -> Result<(), SiteError> {
    fs::create_dir_all(path).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_page(path: &Path, markup: Markup) -> Result<(), SiteError> {
    fs::write(path, markup.into_string()).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

/// Home link, one link per strict ancestor, then the current album as text.
///
/// `current` is `None` on the root page.
fn breadcrumb(home_label: &str, ancestors: &[&Album], current: Option<&Album>) -> Markup {
    let depth = ancestors.len() + usize::from(current.is_some());
    html! {
        nav.breadcrumb {
            a href={ (relative_root(depth)) "index.html" } { (home_label) }
            @for (k, ancestor) in ancestors.iter().enumerate() {
                " › "
                a href={ (relative_root(depth - k - 1)) "index.html" } { (ancestor.title) }
            }
            @if let Some(current) = current {
                " › "
                span.current { (current.title) }
            }
        }
    }
}

/// Renders the page header: breadcrumb trail and album heading
fn site_header(heading: &str, trail: Markup) -> Markup {
    html! {
        header.site-header {
            (trail)
            h1 { (heading) }
        }
    }
}

fn site_footer(home_label: &str, depth: usize) -> Markup {
    html! {
        footer.site-footer {
            a href={ (relative_root(depth)) "index.html" } { (home_label) }
        }
    }
}

/// Child albums, linked relative to the current page.
fn render_album_list(children: &[&Album]) -> Markup {
    html! {
        ul.album-list {
            @for child in children {
                li {
                    a href={ (directory_segment(child)) "/index.html" } { (child.title) }
                }
            }
        }
    }
}

/// One table row per art item.
fn render_art_table(art: &[&ArtItem], chain: &[&Album], options: &SiteOptions) -> Markup {
    let depth = chain.len();
    html! {
        table.art-table {
            tbody {
                @for item in art {
                    @let relative = paths::art_relative_path(chain, item);
                    @let full = asset_url(&options.art_dir, depth, &relative);
                    tr {
                        td.thumb {
                            a href=(full) {
                                img src=(asset_url(&options.thumbs_dir, depth, &relative))
                                    alt=(item.title) loading="lazy";
                            }
                        }
                        td.info {
                            a.art-title href=(full) { (item.title) }
                            p.submitter { "Submitted by " (submitter(item)) }
                            @if let Some(summary) = non_empty(item.summary.as_deref()) {
                                p.summary { (summary) }
                            }
                            @if let Some(description) = non_empty(item.description.as_deref()) {
                                p.description { (description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn submitter(item: &ArtItem) -> &str {
    non_empty(Some(item.owner.fullname.as_str())).unwrap_or(item.owner.username.as_str())
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the page of one album.
///
/// `ancestors` are the album's strict ancestors, `chain` those plus the
/// album itself (empty for the root), `children` its child albums in
/// display order, `art` the items it holds directly.
fn render_album_page(
    album: &Album,
    ancestors: &[&Album],
    chain: &[&Album],
    children: &[&Album],
    art: &[&ArtItem],
    options: &SiteOptions,
) -> Markup {
    let current = chain.last().copied();
    let (page_title, heading) = if chain.is_empty() {
        (options.title.clone(), options.title.as_str())
    } else {
        (
            format!("{} - {}", options.title, album.title),
            album.title.as_str(),
        )
    };

    let content = html! {
        (site_header(heading, breadcrumb(&options.title, ancestors, current)))
        main.album-page {
            @if !children.is_empty() {
                (render_album_list(children))
            }
            @if !art.is_empty() {
                (render_art_table(art, chain, options))
            }
            @if children.is_empty() && art.is_empty() {
                p.empty { "This album is empty." }
            }
        }
        (site_footer(&options.title, chain.len()))
    };

    base_document(&page_title, &options.css, content)
}

// ============================================================================
// Tests
// ============================================================================
