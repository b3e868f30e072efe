use super::debounce::Debounced;
use crate::config::PLACEHOLDER_ROWS;
use crate::domain::amount::Balance;
use crate::domain::profile::{Address, Profile};
use std::time::Duration;

/// What the page shows in place of the payment UI, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    ConnectWallet,
    SwitchNetwork { chain_id: u64 },
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Browsing,
    ReviewingPayment,
    Submitting,
}

/// The result area beneath the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    Idle,
    Loading { placeholders: usize },
    Results(Vec<Profile>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum SearchStatus {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Loaded {
        query: String,
        profiles: Vec<Profile>,
    },
}

/// Process-local state for one page visit.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub address: Option<Address>,
    pub network_mismatch: bool,
    pub balance: Option<Balance>,
    pub search_text: String,
    pub debounced_search: Debounced<String>,
    pub search: SearchStatus,
    pub selected: Option<Profile>,
    pub amount_text: String,
}

impl SessionState {
    pub fn new(search_debounce: Duration) -> Self {
        Self {
            address: None,
            network_mismatch: false,
            balance: None,
            search_text: String::new(),
            debounced_search: Debounced::new(String::new(), search_debounce),
            search: SearchStatus::Idle,
            selected: None,
            amount_text: String::new(),
        }
    }

    pub fn gate(&self, chain_id: u64) -> Gate {
        match (&self.address, self.network_mismatch) {
            (None, _) => Gate::ConnectWallet,
            (Some(_), true) => Gate::SwitchNetwork { chain_id },
            (Some(_), false) => Gate::Ready,
        }
    }

    pub fn phase(&self, submitting: bool) -> Phase {
        if submitting {
            Phase::Submitting
        } else if self.selected.is_some() {
            Phase::ReviewingPayment
        } else {
            Phase::Browsing
        }
    }

    pub fn set_search_text(&mut self, text: String) {
        self.debounced_search.set(text.clone());
        self.search_text = text;
    }

    pub fn search_view(&self) -> SearchView {
        match &self.search {
            SearchStatus::Idle => SearchView::Idle,
            SearchStatus::Loading { .. } => SearchView::Loading {
                placeholders: PLACEHOLDER_ROWS,
            },
            SearchStatus::Loaded { profiles, .. } => SearchView::Results(profiles.clone()),
        }
    }

    /// Drops everything a successful payment consumes.
    pub fn clear_payment(&mut self) {
        self.set_search_text(String::new());
        self.selected = None;
        self.amount_text.clear();
    }
}
