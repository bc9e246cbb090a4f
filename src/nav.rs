//! In-memory page navigation.
//!
//! The shell shows one [`Page`] at a time. Only the diagnostic page has a URL fragment;
//! every other page clears it.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    Auth,
    Account,
    Diagnostic,
}

const DIAGNOSTIC_FRAGMENT: &str = "diagnostic";

impl Page {
    /// Page to open for the URL fragment present at startup, with or without `#`.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.trim_start_matches('#') {
            DIAGNOSTIC_FRAGMENT => Self::Diagnostic,
            _ => Self::Home,
        }
    }

    /// Fragment to set after navigating here. Empty clears it.
    pub fn fragment(self) -> &'static str {
        match self {
            Self::Diagnostic => DIAGNOSTIC_FRAGMENT,
            Self::Home | Self::Auth | Self::Account => "",
        }
    }

    /// Whether the header and footer are shown around the page.
    pub fn shows_chrome(self) -> bool {
        self != Self::Diagnostic
    }

    /// Signed-in users asking for the auth page land on their account instead, and
    /// signed-out users asking for the account land on the auth page.
    pub fn resolve(self, is_authenticated: bool) -> Self {
        match (self, is_authenticated) {
            (Self::Auth, true) => Self::Account,
            (Self::Account, false) => Self::Auth,
            (page, _) => page,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            Self::Home => "Home",
            Self::Auth => "Sign In",
            Self::Account => "Account",
            Self::Diagnostic => "Diagnostics",
        };

        write!(f, "{}", title)
    }
}

/// Home page sections reachable from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Features,
    Reviews,
    Pricing,
    Download,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Features,
        Section::Reviews,
        Section::Pricing,
        Section::Download,
    ];

    /// Element id of the section on the home page.
    pub fn anchor(self) -> &'static str {
        match self {
            Self::Features => "features",
            Self::Reviews => "reviews",
            Self::Pricing => "pricing",
            Self::Download => "download",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Features => "Features",
            Self::Reviews => "Reviews",
            Self::Pricing => "Pricing",
            Self::Download => "Download",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_fragment_opens_diagnostics() {
        assert_eq!(Page::from_fragment("#diagnostic"), Page::Diagnostic);
        assert_eq!(Page::from_fragment("diagnostic"), Page::Diagnostic);
        assert_eq!(Page::from_fragment("#account"), Page::Home);
        assert_eq!(Page::from_fragment(""), Page::Home);
    }

    /// Expect only the diagnostic page to keep a fragment
    #[test]
    fn fragments_round_trip() {
        for page in [Page::Home, Page::Auth, Page::Account, Page::Diagnostic] {
            let expected = if page == Page::Diagnostic { page } else { Page::Home };
            assert_eq!(Page::from_fragment(page.fragment()), expected);
        }
    }

    #[test]
    fn diagnostic_page_hides_chrome() {
        assert!(!Page::Diagnostic.shows_chrome());
        assert!(Page::Account.shows_chrome());
    }

    #[test]
    fn resolves_by_authentication() {
        assert_eq!(Page::Auth.resolve(true), Page::Account);
        assert_eq!(Page::Account.resolve(false), Page::Auth);
        assert_eq!(Page::Home.resolve(false), Page::Home);
        assert_eq!(Page::Diagnostic.resolve(true), Page::Diagnostic);
    }
}
