use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// A file the user asked to add to the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// The name the file reports for itself (its file name).
    pub name: Option<String>,
    pub mime: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string);
        let mime = guess_mime(&path).to_string();
        Self { path, name, mime }
    }
}

/// MIME type for common audio extensions.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") | Some("aac") => "audio/mp4",
        Some("opus") => "audio/opus",
        _ => "application/octet-stream",
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand user supplied paths into the files to ingest.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked and filtered by `settings`; each directory's matches are sorted by
/// lowercase file name. Paths that do not exist are logged and skipped.
pub fn select_files(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<SelectedFile> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(SelectedFile::from_path(path.clone()));
        } else if path.is_dir() {
            files.extend(scan_dir(path, settings));
        } else {
            warn!(path = %path.display(), "skipping path that is neither a file nor a directory");
        }
    }
    files
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<SelectedFile> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut found: Vec<SelectedFile> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|entry| {
            let path = entry.path();
            path.is_file() && is_audio_file(path, settings)
        })
        .map(|entry| SelectedFile::from_path(entry.into_path()))
        .collect();

    found.sort_by_key(|f| f.name.as_deref().unwrap_or_default().to_lowercase());
    found
}
