//! Homebrew catalog wiring.
//!
//! The remote catalog is served as two JSON listings: formulae (keyed by
//! `name`) and casks (keyed by `token`). Both collapse into a single
//! [`PackageIndex`] of name → description; the origin kind is dropped during
//! normalization.

pub mod fetch;
pub mod model;

pub use fetch::{CatalogFetcher, FetchPolicy, HttpFetcher, merge_listings};
pub use model::{CaskRecord, FormulaRecord, PackageEntry, PackageIndex};

/// Default formula listing endpoint.
pub const DEFAULT_FORMULA_URL: &str = "https://formulae.brew.sh/api/formula.json";

/// Default cask listing endpoint.
pub const DEFAULT_CASK_URL: &str = "https://formulae.brew.sh/api/cask.json";
