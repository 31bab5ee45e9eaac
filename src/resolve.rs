//! Decision policy over ranked matches.
//!
//! Pure: it only decides what to show and what to propose. Prompting and
//! running commands is the caller's job.

use crate::catalog::PackageIndex;
use crate::matcher::Match;

/// Candidates farther than this are never offered.
pub const DISTANCE_THRESHOLD: usize = 10;
/// At most this many candidates are listed in a menu.
pub const MENU_LIMIT: usize = 10;

pub const INSTALL_COMMAND: &str = "brew install";
pub const UPDATE_COMMAND: &str = "brew update";
/// Official Homebrew bootstrap, offered when `brew` is missing.
pub const PACKAGE_MANAGER_INSTALL_COMMAND: &str = r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Install `package`; `confirm` is false only for auto-installed exact matches.
    Install { package: String, confirm: bool },
    /// Refresh the package manager's own catalog.
    UpdateCatalog,
    /// Bootstrap the package manager itself.
    InstallPackageManager,
}

impl Action {
    pub fn install(package: &str) -> Self {
        Action::Install {
            package: package.to_string(),
            confirm: true,
        }
    }

    /// The literal command line handed to the shell.
    pub fn command(&self) -> String {
        match self {
            Action::Install { package, .. } => format!("{INSTALL_COMMAND} {package}"),
            Action::UpdateCatalog => UPDATE_COMMAND.to_string(),
            Action::InstallPackageManager => PACKAGE_MANAGER_INSTALL_COMMAND.to_string(),
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Action::Install { .. } => "Install it",
            Action::UpdateCatalog => "Update Homebrew formulae database",
            Action::InstallPackageManager => "Install Homebrew",
        }
    }

    pub fn needs_confirmation(&self) -> bool {
        match self {
            Action::Install { confirm, .. } => *confirm,
            Action::UpdateCatalog | Action::InstallPackageManager => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub description: String,
    pub distance: usize,
}

impl Candidate {
    fn from_match(m: &Match, index: &PackageIndex) -> Self {
        Self {
            name: m.target.clone(),
            description: index.description(&m.target).unwrap_or_default().to_string(),
            distance: m.distance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Numbered candidates, nearest first.
pub struct Menu {
    pub candidates: Vec<Candidate>,
    /// More candidates qualified than were listed.
    pub truncated: bool,
}

impl Menu {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Look up a 1-based selection; anything outside `1..=len` is `None`.
    pub fn select(&self, choice: usize) -> Option<&Candidate> {
        choice
            .checked_sub(1)
            .and_then(|idx| self.candidates.get(idx))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing close enough; propose updating the catalog.
    NoMatch { action: Action },
    Exact { candidate: Candidate, action: Action },
    Menu(Menu),
}

/// Decide what to do with `matches` for `query`.
pub fn resolve(
    query: &str,
    matches: &[Match],
    index: &PackageIndex,
    auto_install: bool,
) -> Resolution {
    if let Some(top) = matches.first() {
        if top.is_exact(query) {
            return Resolution::Exact {
                candidate: Candidate::from_match(top, index),
                action: Action::Install {
                    package: top.target.clone(),
                    confirm: !auto_install,
                },
            };
        }
    }

    let qualifying: Vec<&Match> = matches
        .iter()
        .take_while(|m| m.distance <= DISTANCE_THRESHOLD)
        .collect();
    if qualifying.is_empty() {
        return Resolution::NoMatch {
            action: Action::UpdateCatalog,
        };
    }

    Resolution::Menu(Menu {
        candidates: qualifying
            .iter()
            .take(MENU_LIMIT)
            .map(|m| Candidate::from_match(m, index))
            .collect(),
        truncated: qualifying.len() > MENU_LIMIT,
    })
}
