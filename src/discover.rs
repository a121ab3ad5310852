//! Manifesto discovery
//!
//! Every immediate subdirectory of the corpus root is a candidate topic
//! directory. Hidden directories and the configured exclusions (`dist`,
//! `scripts`, `integrations` by default) are skipped. Each remaining
//! directory contributes at most one manifesto file.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::frontmatter::read_front_matter;

/// A topic directory and the manifesto chosen for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestoSource {
    pub dir: PathBuf,
    pub file: PathBuf,
}

/// Pick the manifesto file of a single directory.
///
/// 1. first `*.md` whose name ends with `suffix`
/// 2. else first `*.md` whose front matter parses
/// 3. else nothing
///
/// Files are visited in file-name order.
pub fn find_manifesto_file(dir: &Path, suffix: &str) -> Option<PathBuf> {
    let md_files = markdown_files(dir);

    if let Some(file) = md_files.iter().find(|f| has_suffix(f, suffix)) {
        return Some(file.clone());
    }

    md_files
        .into_iter()
        .find(|f| read_front_matter(f).is_some())
}

/// Scan the corpus root for topic directories that hold a manifesto.
///
/// Sorted by directory path. Fails only if the root itself cannot be listed.
pub fn discover_manifestos(config: &Config) -> std::io::Result<Vec<ManifestoSource>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(config.root())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !config.is_excluded_dir(name))
                .unwrap_or(false)
        })
        .map(|entry| entry.path())
        .collect();
    dirs.sort();

    let sources = dirs
        .into_iter()
        .filter_map(|dir| {
            let file = find_manifesto_file(&dir, &config.discovery.manifesto_suffix);
            if file.is_none() {
                tracing::debug!("No manifesto in {}", dir.display());
            }
            file.map(|file| ManifestoSource { dir, file })
        })
        .collect();

    Ok(sources)
}

fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(suffix))
        .unwrap_or(false)
}
