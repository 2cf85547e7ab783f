use std::env;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config;
use crate::library::{Catalog, JsonFileStore, KvStore, MemoryStore};

/// Open the playlist store in `data_dir`, or keep the playlist in memory
/// when there is nowhere to write it.
pub fn open_store(data_dir: Option<&Path>) -> Box<dyn KvStore> {
    match data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "playlist store");
            Box::new(JsonFileStore::new(dir))
        }
        None => {
            warn!("no data directory, the playlist will not be saved");
            Box::new(MemoryStore::default())
        }
    }
}

pub fn load_catalog(settings: &config::Settings) -> Catalog {
    let data_dir = settings.data_dir();
    let store = open_store(data_dir.as_deref());
    Catalog::load_persisted(store, settings.storage.playlist_key.clone())
}

/// Expand a leading `~` the way a shell would.
pub fn expand_home(input: &str) -> PathBuf {
    let home = env::var_os("HOME").map(PathBuf::from);
    expand_home_with(input, home.as_deref())
}

pub(super) fn expand_home_with(input: &str, home: Option<&Path>) -> PathBuf {
    match (input.strip_prefix('~'), home) {
        (Some(""), Some(h)) => h.to_path_buf(),
        (Some(rest), Some(h)) if rest.starts_with('/') => h.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(input),
    }
}

/// Paths given on the command line.
pub fn cli_paths() -> Vec<PathBuf> {
    env::args().skip(1).map(|a| expand_home(&a)).collect()
}
