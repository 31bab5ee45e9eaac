//! Suggests and installs a Homebrew package when a typed command is not found.
//!
//! The core is the package-index lifecycle ([`cache`], [`catalog`]), the fuzzy
//! [`matcher`], and the [`resolve`] policy. [`lookup`] wires them to a
//! [`Session`], which owns prompting and command execution.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod exec;
pub mod lookup;
pub mod matcher;
pub mod resolve;
pub mod session;

pub use cache::{CacheMeta, CacheStore, LoadedIndex};
pub use catalog::{CatalogFetcher, FetchPolicy, HttpFetcher, PackageEntry, PackageIndex};
pub use config::Config;
pub use error::{Error, Result};
pub use exec::{CommandRunner, ShellRunner};
pub use lookup::{find_package, refresh_cache};
pub use matcher::{Distance, FoldDistance, Match, rank, rank_with};
pub use resolve::{Action, Candidate, Menu, Resolution, resolve};
pub use session::{ActionOutcome, Flags, Session};

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Executable name of the package manager this tool drives.
pub const PACKAGE_MANAGER: &str = "brew";

/// Locate an executable named `name` on `PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    find_in_paths(name, env::var_os("PATH")?.as_os_str())
}

/// Whether the package manager is installed.
pub fn package_manager_present() -> bool {
    find_on_path(PACKAGE_MANAGER).is_some()
}

fn find_in_paths(name: &str, paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        true
    }
}
