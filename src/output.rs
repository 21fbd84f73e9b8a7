//! CLI output formatting for every command.
//!
//! Output is **information-centric**: each entity leads with its positional
//! index and title, and the file it produced follows after `→`. The album
//! tree is shown with four spaces of indentation per level, in the same
//! title-sorted order the site uses.
//!
//! ## Check
//!
//! ```text
//! Source: snapshot gallery.json
//!     7 albums, 4 art items
//!     Root: album 0
//!     Depth: 2
//!     Dangling album parents: none
//!     Orphaned art: 30
//! ```
//!
//! ## Export
//!
//! ```text
//! Art → out/art.json (4 items)
//! Albums → out/art_by_album.json (7 albums)
//! ```
//!
//! ## Site
//!
//! ```text
//! Home → index.html
//! 001 Art → art-3/index.html
//!     001 Misc → art-3/misc-6/index.html
//! 002 Vacation (1 item) → vacation-1/index.html
//!     001 Beach (1 item) → vacation-1/beach-4/index.html
//!
//! Generated 5 pages, 2 art entries in html
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::document::ExportSummary;
use crate::site::SiteReport;
use crate::tree::IntegrityReport;
use crate::types::{EntityId, Gallery};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format an album header: positional index + title, with its art count
/// when it holds any.
///
/// ```text
/// 002 Vacation (3 items)
/// 001 Misc
/// ```
fn entity_header(index: usize, title: &str, art_count: usize) -> String {
    if art_count == 0 {
        format!("{} {}", format_index(index), title)
    } else {
        format!(
            "{} {} ({})",
            format_index(index),
            title,
            plural(art_count, "item", "items")
        )
    }
}

fn id_list(ids: &[EntityId]) -> String {
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Load
// ============================================================================

pub fn format_load_output(source: &str, gallery: &Gallery) -> Vec<String> {
    vec![
        format!("Source: {}", source),
        format!(
            "    {}, {}",
            plural(gallery.albums.len(), "album", "albums"),
            plural(gallery.art.len(), "art item", "art items")
        ),
    ]
}

pub fn print_load_output(source: &str, gallery: &Gallery) {
    for line in format_load_output(source, gallery) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the integrity report of `check`. Only the detail lines; the
/// load lines precede them.
pub fn format_check_output(report: &IntegrityReport) -> Vec<String> {
    let mut lines = vec![
        format!("    Root: album {}", report.root_id),
        format!("    Depth: {}", report.max_depth),
        format!(
            "    Dangling album parents: {}",
            id_list(&report.dangling_albums)
        ),
        format!("    Orphaned art: {}", id_list(&report.orphaned_art)),
    ];
    if report.unreachable_albums > 0 {
        lines.push(format!(
            "    Unreachable from root: {}",
            plural(report.unreachable_albums, "album", "albums")
        ));
    }
    lines
}

pub fn print_check_output(report: &IntegrityReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

pub fn format_export_output(summary: &ExportSummary) -> Vec<String> {
    vec![
        format!(
            "Art \u{2192} {} ({})",
            summary.art_path.display(),
            plural(summary.art_count, "item", "items")
        ),
        format!(
            "Albums \u{2192} {} ({})",
            summary.albums_path.display(),
            plural(summary.album_count, "album", "albums")
        ),
    ]
}

pub fn print_export_output(summary: &ExportSummary) {
    for line in format_export_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Site
// ============================================================================

/// Format the pages written by the site generator as an indented tree.
pub fn format_site_output(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();
    // positions[d] = index of the last page seen at depth d + 1
    let mut positions: Vec<usize> = Vec::new();

    for page in &report.pages {
        if page.depth == 0 {
            lines.push(format!("Home \u{2192} {}", page.path));
            continue;
        }
        positions.truncate(page.depth);
        if positions.len() < page.depth {
            positions.resize(page.depth, 0);
        }
        positions[page.depth - 1] += 1;

        let header = entity_header(positions[page.depth - 1], &page.title, page.art_count);
        lines.push(format!(
            "{}{} \u{2192} {}",
            indent(page.depth - 1),
            header,
            page.path
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.art_count(), "art entry", "art entries"),
        report.html_dir.display()
    ));
    lines
}

pub fn print_site_output(report: &SiteReport) {
    for line in format_site_output(report) {
        println!("{}", line);
    }
}
