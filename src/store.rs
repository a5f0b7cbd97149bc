//! Playlist stores nested `playlist` rules are resolved against.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::media::{check_type_compatibility, MediaType};
use crate::playlist::{Playlist, PlaylistStore};

/// Subdirectories playlists are saved under, next to the store root itself.
const SAVE_LOCATIONS: [&str; 3] = ["music", "video", "mixed"];

/// In-memory playlists, looked up by case-insensitive name.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    playlists: Vec<Playlist>,
}

impl MemoryStore {
    /// Adds a playlist, replacing one of the same name and type.
    pub fn insert(&mut self, playlist: Playlist) {
        self.playlists.retain(|existing| {
            existing.media_type != playlist.media_type
                || !existing.name.eq_ignore_ascii_case(&playlist.name)
        });
        self.playlists.push(playlist);
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Playlist named `name`, preferring one of exactly `media_type` over
    /// one that is merely compatible with it.
    fn find(&self, name: &str, media_type: MediaType) -> Option<&Playlist> {
        let name = name.trim();
        let mut candidates = self
            .playlists
            .iter()
            .filter(|p| p.name.trim().eq_ignore_ascii_case(name))
            .filter(|p| check_type_compatibility(p.media_type, media_type));
        let first = candidates.next()?;
        if first.media_type == media_type {
            return Some(first);
        }
        Some(
            candidates
                .find(|p| p.media_type == media_type)
                .unwrap_or(first),
        )
    }
}

impl PlaylistStore for MemoryStore {
    fn playlist_by_name(&self, name: &str, media_type: MediaType) -> Option<Playlist> {
        self.find(name, media_type).cloned()
    }
}

/// Playlists saved as JSON documents under a directory, in the `music`,
/// `video` and `mixed` subdirectories or at the root.
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    playlists: MemoryStore,
}

impl DirectoryStore {
    /// Loads every `*.json` playlist below `root`. Unreadable documents are
    /// skipped with a warning.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "playlist directory does not exist: {}",
                root.display()
            )));
        }

        let mut playlists = MemoryStore::default();
        let dirs = std::iter::once(root.clone())
            .chain(SAVE_LOCATIONS.iter().map(|location| root.join(location)))
            .filter(|dir| dir.is_dir());
        for dir in dirs {
            for path in json_files(&dir)? {
                match load_playlist(&path) {
                    Ok(playlist) => {
                        debug!("loaded playlist '{}' from {}", playlist.name, path.display());
                        playlists.insert(playlist);
                    }
                    Err(e) => warn!("skipping {}: {}", path.display(), e),
                }
            }
        }
        info!(
            "loaded {} playlists from {}",
            playlists.len(),
            root.display()
        );
        Ok(DirectoryStore { root, playlists })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn playlists(&self) -> &[Playlist] {
        self.playlists.playlists()
    }

    /// Writes `playlist` to `<root>/<save location>/<name>.json` and keeps it
    /// for later lookups.
    pub fn save(&mut self, playlist: &Playlist) -> Result<PathBuf> {
        let dir = self.root.join(playlist.save_location());
        fs::create_dir_all(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(format!("{}.json", file_stem(&playlist.name)));
        fs::write(&path, playlist.to_json_string()?).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        self.playlists.insert(playlist.clone());
        Ok(path)
    }
}

impl PlaylistStore for DirectoryStore {
    fn playlist_by_name(&self, name: &str, media_type: MediaType) -> Option<Playlist> {
        self.playlists.playlist_by_name(name, media_type)
    }
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn load_playlist(path: &Path) -> Result<Playlist> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut playlist = Playlist::from_json_str(&content)?;
    if playlist.name.trim().is_empty() {
        if let Some(stem) = path.file_stem() {
            playlist.name = stem.to_string_lossy().into_owned();
        }
    }
    Ok(playlist)
}

/// Name usable as a file name on every platform.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
