//! Lookup driver: cache → match engine → resolution policy → session.

use crate::cache::CacheStore;
use crate::catalog::CatalogFetcher;
use crate::error::Result;
use crate::matcher::rank;
use crate::resolve::{Action, Menu, Resolution, resolve};
use crate::session::Session;
use crossterm::style::Stylize;
use tracing::debug;

/// Resolve `query` against the cached index and act on the result.
///
/// An exact match is offered for installation. Otherwise nearby candidates are
/// listed for the user to pick from; when nothing is picked (or nothing is
/// close) the catalog update is offered instead. Returns the resolution that
/// was presented.
pub fn find_package(
    session: &mut Session<'_>,
    store: &CacheStore,
    fetcher: &dyn CatalogFetcher,
    query: &str,
) -> Result<Resolution> {
    let loaded = store.get_index(fetcher, false)?;
    let matches = rank(query, &loaded.names);
    debug!(query, candidates = matches.len(), "ranked package names");

    let resolution = resolve(
        query,
        &matches,
        &loaded.index,
        session.flags().auto_install_exact,
    );

    match &resolution {
        Resolution::Exact { candidate, action } => {
            session.say(format!(
                "Found exact match: {}{}",
                candidate.name.as_str().yellow(),
                format!(" ({})", candidate.description).dark_grey()
            ));
            if session.flags().interactive && !action.needs_confirmation() {
                session.say(
                    "Installing it because auto-install is enabled. \
                     ($TII_AUTO_INSTALL_EXACT_MATCHES is true)",
                );
            }
            session.run_action(action);
            return Ok(resolution);
        }
        Resolution::Menu(menu) => {
            if offer_menu(session, menu) {
                return Ok(resolution);
            }
        }
        Resolution::NoMatch { .. } => {}
    }

    session.say(format!(
        "No exact matches found for {}.",
        query.yellow()
    ));
    session.run_action(&Action::UpdateCatalog);
    Ok(resolution)
}

/// List the menu and install the picked candidate. Returns whether an install
/// was approved.
fn offer_menu(session: &mut Session<'_>, menu: &Menu) -> bool {
    session.say("Presenting fuzzy matches");
    for (idx, candidate) in menu.candidates.iter().enumerate() {
        session.say(format!(
            "{}: {}{}",
            (idx + 1).to_string().cyan(),
            candidate.name,
            format!(" ({})", candidate.description).dark_grey()
        ));
    }
    if menu.truncated {
        session.say("... and more");
    }

    let Some(choice) =
        session.prompt_index("Enter number to install or press enter to quit", menu.len())
    else {
        return false;
    };
    let Some(candidate) = menu.select(choice) else {
        return false;
    };
    session
        .run_action(&Action::install(&candidate.name))
        .approved()
}

/// Force a refresh of the cache.
pub fn refresh_cache(store: &CacheStore, fetcher: &dyn CatalogFetcher) -> Result<usize> {
    let index = store.refresh(fetcher)?;
    Ok(index.len())
}
