//! Local cache store for the package index.
//!
//! The index lives in `<data root>/tii/pkginfo.json` as a plain JSON object of
//! name → description. A sidecar `pkginfo.meta.json` records when the index was
//! written. Presence of the index file is the freshness signal; age-based
//! expiry only applies when a maximum age is configured.

use crate::catalog::{CatalogFetcher, PackageIndex};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Directory under the data root that holds the cache.
pub const APP_SUBDIR: &str = "tii";
/// Cache file name.
pub const CACHE_FILE: &str = "pkginfo.json";
/// Freshness metadata file name.
pub const META_FILE: &str = "pkginfo.meta.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Freshness metadata written next to the index.
pub struct CacheMeta {
    /// Unix timestamp of the last refresh.
    pub cached_at: u64,
    /// Number of entries written.
    pub entries: usize,
}

/// The index plus its name list, as handed to the match engine.
#[derive(Debug)]
pub struct LoadedIndex {
    pub names: Vec<String>,
    pub index: PackageIndex,
    /// True when this call fetched from the remote catalog.
    pub refreshed: bool,
}

#[derive(Clone, Debug)]
pub struct CacheStore {
    dir: PathBuf,
    max_age: Option<Duration>,
}

impl CacheStore {
    /// Store rooted at `<data_root>/tii`.
    pub fn new(data_root: &Path) -> Self {
        Self {
            dir: data_root.join(APP_SUBDIR),
            max_age: None,
        }
    }

    /// Treat caches older than `max_age` as absent. `None` never expires.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Load the cached index, refreshing it first when the file is missing,
    /// expired, or `force_refresh` is set.
    pub fn get_index(
        &self,
        fetcher: &dyn CatalogFetcher,
        force_refresh: bool,
    ) -> Result<LoadedIndex> {
        let path = self.data_path();
        if force_refresh || !path.exists() || self.is_expired() {
            let index = self.refresh(fetcher)?;
            return Ok(LoadedIndex {
                names: index.names(),
                index,
                refreshed: true,
            });
        }

        let index = self.load()?;
        Ok(LoadedIndex {
            names: index.names(),
            index,
            refreshed: false,
        })
    }

    /// Fetch a fresh index and overwrite the cache with it.
    pub fn refresh(&self, fetcher: &dyn CatalogFetcher) -> Result<PackageIndex> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| Error::cache(&self.dir, format!("creating directory: {err}")))?;

        info!(path = %self.data_path().display(), "refreshing package cache");
        let index = fetcher.fetch()?;
        self.store(&index)?;
        Ok(index)
    }

    /// Persist `index` atomically, then record freshness metadata.
    pub fn store(&self, index: &PackageIndex) -> Result<()> {
        let path = self.data_path();
        fs::create_dir_all(&self.dir)
            .map_err(|err| Error::cache(&self.dir, format!("creating directory: {err}")))?;

        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|err| Error::cache(&path, format!("creating temp file: {err}")))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, index)
                .map_err(|err| Error::cache(&path, format!("encoding index: {err}")))?;
            writer
                .flush()
                .map_err(|err| Error::cache(&path, format!("writing index: {err}")))?;
        }
        temp.persist(&path)
            .map_err(|err| Error::cache(&path, format!("replacing cache file: {}", err.error)))?;
        debug!(entries = index.len(), path = %path.display(), "wrote package cache");

        let meta = CacheMeta {
            cached_at: now_secs(),
            entries: index.len(),
        };
        // The index is already usable; a missing sidecar only disables age checks.
        if let Err(err) = self.write_meta(&meta) {
            warn!("{err}");
        }
        Ok(())
    }

    /// Read the cached index from disk.
    pub fn load(&self) -> Result<PackageIndex> {
        let path = self.data_path();
        let file = File::open(&path).map_err(|err| Error::cache(&path, format!("opening: {err}")))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            Error::cache(
                &path,
                format!("decoding: {err}; run `tii --refresh-cache` to rebuild it"),
            )
        })
    }

    /// Metadata from the last refresh, if it was recorded.
    pub fn read_meta(&self) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Time since the last refresh, if known.
    pub fn age(&self) -> Option<Duration> {
        let meta = self.read_meta()?;
        Some(Duration::from_secs(now_secs().saturating_sub(meta.cached_at)))
    }

    /// Whether a configured maximum age has been exceeded. A cache without
    /// metadata counts as expired once a maximum age is set.
    pub fn is_expired(&self) -> bool {
        let Some(max_age) = self.max_age else {
            return false;
        };
        match self.age() {
            Some(age) => age > max_age,
            None => true,
        }
    }

    fn write_meta(&self, meta: &CacheMeta) -> Result<()> {
        let path = self.meta_path();
        let json = serde_json::to_string_pretty(meta)
            .map_err(|err| Error::cache(&path, format!("encoding metadata: {err}")))?;
        fs::write(&path, json).map_err(|err| Error::cache(&path, format!("writing metadata: {err}")))
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
