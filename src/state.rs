//! Page state owned by the dashboard root: selected company and open card.
//!
//! The open card is mirrored in the `open` query parameter. Updates go
//! through a [`Navigator`] as a replace, so toggling cards never grows the
//! navigation history.

use url::Url;

use crate::catalog::compose_cards;
use crate::types::{Company, FilteredCard, MenuSection};

pub const OPEN_CARD_PARAM: &str = "open";

/// Navigation layer the page state writes through.
pub trait Navigator {
    fn current_url(&self) -> Url;

    /// Swap the current history entry for `url`.
    fn replace(&mut self, url: Url);

    /// Add a new history entry for `url`.
    fn push(&mut self, url: Url);
}

/// Navigator kept in memory, used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    current: Url,
    entries: usize,
    replaces: usize,
}

impl MemoryNavigator {
    pub fn new(url: Url) -> Self {
        Self {
            current: url,
            entries: 1,
            replaces: 0,
        }
    }

    pub fn history_len(&self) -> usize {
        self.entries
    }

    pub fn replace_count(&self) -> usize {
        self.replaces
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> Url {
        self.current.clone()
    }

    fn replace(&mut self, url: Url) {
        self.replaces += 1;
        self.current = url;
    }

    fn push(&mut self, url: Url) {
        self.entries += 1;
        self.current = url;
    }
}

/// Card key from the `open` parameter. An empty value counts as absent.
pub fn open_card_from(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == OPEN_CARD_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// `url` with `open` set to `key`, or removed for `None`. Other parameters
/// keep their order; `open` stays in place when it already existed.
pub fn with_open_card(url: &Url, key: Option<&str>) -> Url {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (k, v) in url.query_pairs() {
        if k == OPEN_CARD_PARAM {
            if let (Some(key), false) = (key, replaced) {
                pairs.push((k.into_owned(), key.to_string()));
                replaced = true;
            }
            continue;
        }
        pairs.push((k.into_owned(), v.into_owned()));
    }
    if let (Some(key), false) = (key, replaced) {
        pairs.push((OPEN_CARD_PARAM.to_string(), key.to_string()));
    }

    let mut next = url.clone();
    if pairs.is_empty() {
        next.set_query(None);
    } else {
        next.query_pairs_mut().clear().extend_pairs(pairs);
    }
    next
}

/// Selected company and open card for one dashboard page.
pub struct DashboardState<N: Navigator> {
    navigator: N,
    selected_company: Company,
    open_card: Option<String>,
}

impl<N: Navigator> DashboardState<N> {
    /// Hydrate the open card from the navigator's current URL.
    pub fn new(navigator: N, company: Company) -> Self {
        let open_card = open_card_from(&navigator.current_url());
        Self {
            navigator,
            selected_company: company,
            open_card,
        }
    }

    pub fn selected_company(&self) -> Company {
        self.selected_company
    }

    /// Set the active company. Selecting the current one keeps it selected.
    pub fn select_company(&mut self, company: Company) {
        if company != self.selected_company {
            log::debug!("Company filter {} -> {}", self.selected_company, company);
        }
        self.selected_company = company;
    }

    pub fn open_card(&self) -> Option<&str> {
        self.open_card.as_deref()
    }

    pub fn set_open_card(&mut self, key: Option<&str>) {
        self.open_card = key.map(str::to_string);
        let url = with_open_card(&self.navigator.current_url(), key);
        self.navigator.replace(url);
    }

    /// Open `key`, or close it when it is already open.
    pub fn toggle_card(&mut self, key: &str) {
        if self.open_card.as_deref() == Some(key) {
            self.set_open_card(None);
        } else {
            self.set_open_card(Some(key));
        }
    }

    /// Cards visible under the current company.
    pub fn cards(&self, catalog: &[MenuSection]) -> Vec<FilteredCard> {
        compose_cards(catalog, self.selected_company)
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}
