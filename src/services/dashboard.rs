// Dashboard service: composes cards, gates chart data on the store state, and
// drives the per-page reveal animation.

use std::time::Instant;

use serde::Serialize;

use crate::catalog::{menu_catalog, COMPLAINT_CARD, GRC_CARD, STOCK_CARD};
use crate::charts::layout::{bar_layout, BarLayout};
use crate::charts::reveal::{RevealController, RevealPhase};
use crate::charts::tooltip::{status_bars, StatusBar};
use crate::charts::{complaint_type_series, grc_bar_series, ColoredDatum};
use crate::data::{DashboardDataStore, DataSnapshot};
use crate::normalize::{
    complaint_counters, complaint_status, complaint_types, grc_bars, merge_status_rows,
    stock_donut, stock_meta, ComplaintCounters, StockMeta,
};
use crate::state::{DashboardState, Navigator};
use crate::types::{Company, DashboardPayload, DivisionMetric, FilteredCard};

pub const COMPLAINT_LOADING: &str = "Loading Customer Data ...";
pub const STOCK_LOADING: &str = "Loading Stock Data ...";
pub const GRC_LOADING: &str = "Loading Retail Data ...";
pub const ERROR_PLACEHOLDER: &str = "Error Loading ...";

/// Building the view should stay under this.
const VIEW_LATENCY_BUDGET_MS: u128 = 50;

/// What a card's chart area shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChartSlot<T> {
    Loading { message: String },
    Error { message: String },
    Ready { data: T },
}

impl<T> ChartSlot<T> {
    /// Loading and error win over data; normalization only runs on ready data.
    pub fn gate(
        snapshot: &DataSnapshot,
        loading_message: &str,
        build: impl FnOnce(&DashboardPayload) -> T,
    ) -> Self {
        if snapshot.loading {
            return ChartSlot::Loading {
                message: loading_message.to_string(),
            };
        }
        if snapshot.error.is_some() {
            return ChartSlot::Error {
                message: ERROR_PLACEHOLDER.to_string(),
            };
        }
        match snapshot.ready() {
            Some(payload) => ChartSlot::Ready {
                data: build(payload),
            },
            // Not fetched yet
            None => ChartSlot::Loading {
                message: loading_message.to_string(),
            },
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ChartSlot::Ready { data } => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCharts {
    pub status_bars: Vec<StatusBar>,
    pub status_layout: BarLayout,
    pub complaint_types: Vec<ColoredDatum>,
    pub counters: ComplaintCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCharts {
    pub donut: Vec<DivisionMetric>,
    pub meta: StockMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrcCharts {
    pub bars: Vec<ColoredDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "lowercase")]
pub enum CardCharts {
    Complaint(ChartSlot<ComplaintCharts>),
    Stock(ChartSlot<StockCharts>),
    Grc(ChartSlot<GrcCharts>),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCard {
    #[serde(flatten)]
    pub card: FilteredCard,
    pub open: bool,
    pub charts: CardCharts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub company: Company,
    pub open_card: Option<String>,
    pub status_reveal: RevealPhase,
    pub cards: Vec<DashboardCard>,
}

impl DashboardView {
    pub fn card(&self, key: &str) -> Option<&DashboardCard> {
        self.cards.iter().find(|c| c.card.key == key)
    }

    /// Merged complaint status bars, when the complaint card has data.
    pub fn status_bars(&self) -> Option<&[StatusBar]> {
        match &self.card(COMPLAINT_CARD)?.charts {
            CardCharts::Complaint(slot) => slot.data().map(|c| c.status_bars.as_slice()),
            _ => None,
        }
    }
}

fn charts_for(
    key: &str,
    snapshot: &DataSnapshot,
    filter: Company,
    container_height: f64,
) -> CardCharts {
    match key {
        COMPLAINT_CARD => CardCharts::Complaint(ChartSlot::gate(snapshot, COMPLAINT_LOADING, |p| {
            let rows = merge_status_rows(complaint_status(p, filter));
            ComplaintCharts {
                status_layout: bar_layout(rows.len(), container_height),
                status_bars: status_bars(&rows),
                complaint_types: complaint_type_series(&complaint_types(p, filter)),
                counters: complaint_counters(p, filter),
            }
        })),
        STOCK_CARD => CardCharts::Stock(ChartSlot::gate(snapshot, STOCK_LOADING, |p| StockCharts {
            donut: stock_donut(p, filter),
            meta: stock_meta(p, filter),
        })),
        GRC_CARD => CardCharts::Grc(ChartSlot::gate(snapshot, GRC_LOADING, |p| GrcCharts {
            bars: grc_bar_series(&grc_bars(p, filter)),
        })),
        _ => CardCharts::None,
    }
}

/// Build the dashboard view for one filter. Each card is gated on its own,
/// so a card without chart data never hides the others.
pub fn build_dashboard_view(
    cards: Vec<FilteredCard>,
    snapshot: &DataSnapshot,
    filter: Company,
    open_card: Option<&str>,
    container_height: f64,
) -> DashboardView {
    let start = Instant::now();

    let cards = cards
        .into_iter()
        .map(|card| {
            let charts = charts_for(&card.key, snapshot, filter, container_height);
            DashboardCard {
                open: open_card == Some(card.key.as_str()),
                card,
                charts,
            }
        })
        .collect();

    let elapsed_ms = start.elapsed().as_millis();
    if elapsed_ms > VIEW_LATENCY_BUDGET_MS {
        log::warn!(
            "build_dashboard_view exceeded latency budget: {}ms > {}ms",
            elapsed_ms,
            VIEW_LATENCY_BUDGET_MS
        );
    }

    DashboardView {
        company: filter,
        open_card: open_card.map(str::to_string),
        status_reveal: RevealPhase::Idle,
        cards,
    }
}

/// The dashboard page: page state, data store, and the status chart reveal.
/// Dropping the page detaches the store so late responses are ignored.
pub struct DashboardPage<N: Navigator> {
    state: DashboardState<N>,
    store: DashboardDataStore,
    status_reveal: RevealController,
    container_height: f64,
}

impl<N: Navigator> DashboardPage<N> {
    pub fn new(state: DashboardState<N>, store: DashboardDataStore, container_height: f64) -> Self {
        Self {
            state,
            store,
            status_reveal: RevealController::new(),
            container_height,
        }
    }

    pub fn state(&self) -> &DashboardState<N> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState<N> {
        &mut self.state
    }

    pub fn store(&self) -> &DashboardDataStore {
        &self.store
    }

    pub fn status_reveal(&self) -> &RevealController {
        &self.status_reveal
    }

    /// Fetch (or refetch) the payload.
    pub async fn load(&self) -> bool {
        self.store.refetch().await
    }

    /// Current view. New complaint status content restarts the reveal;
    /// identical content leaves it alone.
    pub fn view(&mut self) -> DashboardView {
        let filter = self.state.selected_company();
        let mut view = build_dashboard_view(
            self.state.cards(menu_catalog()),
            &self.store.snapshot(),
            filter,
            self.state.open_card(),
            self.container_height,
        );
        if let Some(bars) = view.status_bars() {
            if self.status_reveal.observe(bars) {
                log::debug!("Status chart content changed, restarting reveal");
            }
        }
        view.status_reveal = self.status_reveal.phase();
        view
    }
}

impl<N: Navigator> Drop for DashboardPage<N> {
    fn drop(&mut self) {
        self.store.detach();
    }
}
