//! Environment-derived configuration, read once at process entry.

use crate::cache::CacheStore;
use crate::catalog::{DEFAULT_CASK_URL, DEFAULT_FORMULA_URL, FetchPolicy, HttpFetcher};
use crate::error::{Error, Result};
use crate::session::Flags;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DISABLE_INTERACTIVE: &str = "TII_DISABLE_INTERACTIVE";
pub const ENV_AUTO_INSTALL_EXACT: &str = "TII_AUTO_INSTALL_EXACT_MATCHES";
pub const ENV_FORMULA_URL: &str = "TII_FORMULA_URL";
pub const ENV_CASK_URL: &str = "TII_CASK_URL";
pub const ENV_CACHE_MAX_AGE_DAYS: &str = "TII_CACHE_MAX_AGE_DAYS";
pub const ENV_ALLOW_PARTIAL_CATALOG: &str = "TII_ALLOW_PARTIAL_CATALOG";

const DEFAULT_SHELL: &str = "/bin/sh";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Root under which `tii/pkginfo.json` lives.
    pub data_root: PathBuf,
    pub interactive: bool,
    pub auto_install_exact: bool,
    pub formula_url: String,
    pub cask_url: String,
    /// `None` keeps the cache until an explicit refresh.
    pub cache_max_age: Option<Duration>,
    pub fetch_policy: FetchPolicy,
    pub shell: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let data_root = match var("XDG_DATA_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => match var("HOME").or_else(|| var("USERPROFILE")) {
                Some(home) => PathBuf::from(home).join(".local").join("share"),
                None => {
                    return Err(Error::Config(
                        "cannot locate a data directory; set XDG_DATA_HOME or HOME".to_string(),
                    ));
                }
            },
        };

        let cache_max_age = match var(ENV_CACHE_MAX_AGE_DAYS) {
            Some(raw) => {
                let days: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "{ENV_CACHE_MAX_AGE_DAYS} must be a whole number of days, got '{raw}'"
                    ))
                })?;
                let secs = days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
                    Error::Config(format!("{ENV_CACHE_MAX_AGE_DAYS} is too large, got '{raw}'"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            data_root,
            interactive: var(ENV_DISABLE_INTERACTIVE).as_deref() != Some("true"),
            auto_install_exact: var(ENV_AUTO_INSTALL_EXACT).as_deref() == Some("true"),
            formula_url: var(ENV_FORMULA_URL).unwrap_or_else(|| DEFAULT_FORMULA_URL.to_string()),
            cask_url: var(ENV_CASK_URL).unwrap_or_else(|| DEFAULT_CASK_URL.to_string()),
            cache_max_age,
            fetch_policy: FetchPolicy {
                allow_partial_catalog: var(ENV_ALLOW_PARTIAL_CATALOG).as_deref() != Some("false"),
            },
            shell: var("SHELL")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SHELL)),
        })
    }

    pub fn flags(&self) -> Flags {
        Flags {
            interactive: self.interactive,
            auto_install_exact: self.auto_install_exact,
        }
    }

    pub fn cache_store(&self) -> CacheStore {
        CacheStore::new(&self.data_root).with_max_age(self.cache_max_age)
    }

    pub fn fetcher(&self) -> HttpFetcher {
        HttpFetcher::new(&self.formula_url, &self.cask_url).with_policy(self.fetch_policy)
    }
}
