//! Remote index fetcher.
//!
//! Pulls the formula and cask listings, decodes each into its record shape,
//! and flattens both into one [`PackageIndex`]. Casks are merged after
//! formulae, so a cask wins a name collision.

use crate::catalog::{CaskRecord, FormulaRecord, PackageIndex};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Anything that can produce a fresh package index.
///
/// The cache store only depends on this trait; tests hand it canned data.
pub trait CatalogFetcher {
    fn fetch(&self) -> Result<PackageIndex>;
}

impl<F> CatalogFetcher for F
where
    F: Fn() -> Result<PackageIndex>,
{
    fn fetch(&self) -> Result<PackageIndex> {
        self()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How to treat a failure of one of the two listings.
pub struct FetchPolicy {
    /// Keep the data of the source that succeeded when the other fails.
    /// A failure of both sources is always an error.
    pub allow_partial_catalog: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            allow_partial_catalog: true,
        }
    }
}

/// Fetches both listings over HTTP.
pub struct HttpFetcher {
    agent: ureq::Agent,
    formula_url: String,
    cask_url: String,
    policy: FetchPolicy,
}

impl HttpFetcher {
    pub fn new(formula_url: impl Into<String>, cask_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new(),
            formula_url: formula_url.into(),
            cask_url: cask_url.into(),
            policy: FetchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn listing<T: DeserializeOwned>(&self, source_name: &'static str, url: &str) -> Result<Vec<T>> {
        debug!(source = source_name, url, "fetching catalog listing");
        let fetch_error = |message: String| Error::Fetch {
            source_name,
            url: url.to_string(),
            message,
        };
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| fetch_error(err.to_string()))?;
        let records: Vec<T> = response
            .into_json()
            .map_err(|err| fetch_error(format!("decoding response: {err}")))?;
        debug!(source = source_name, count = records.len(), "decoded catalog listing");
        Ok(records)
    }
}

impl CatalogFetcher for HttpFetcher {
    fn fetch(&self) -> Result<PackageIndex> {
        let formulae = self.listing::<FormulaRecord>("formula", &self.formula_url);
        let casks = self.listing::<CaskRecord>("cask", &self.cask_url);
        merge_listings(formulae, casks, self.policy)
    }
}

/// Combine the two listing outcomes under `policy`.
pub fn merge_listings(
    formulae: Result<Vec<FormulaRecord>>,
    casks: Result<Vec<CaskRecord>>,
    policy: FetchPolicy,
) -> Result<PackageIndex> {
    let (formulae, casks) = match (formulae, casks) {
        (Ok(formulae), Ok(casks)) => (formulae, casks),
        (Err(err), Err(other)) => {
            warn!("{other}");
            return Err(err);
        }
        (Err(err), Ok(casks)) => {
            if !policy.allow_partial_catalog {
                return Err(err);
            }
            warn!("{err}; continuing with casks only");
            (Vec::new(), casks)
        }
        (Ok(formulae), Err(err)) => {
            if !policy.allow_partial_catalog {
                return Err(err);
            }
            warn!("{err}; continuing with formulae only");
            (formulae, Vec::new())
        }
    };

    let mut index = PackageIndex::new();
    index.extend(formulae);
    index.extend(casks);
    Ok(index)
}
