pub mod catalog;
pub mod charts;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod health;
pub mod normalize;
pub mod notification;
pub mod overlays;
pub mod services;
pub mod state;
pub mod types;
pub mod util;
pub mod validation;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use url::Url;

use client::{ApiClient, DashboardApi};
use config::{load_config, load_config_from};
use data::DashboardDataStore;
use error::{DashboardError, ServiceError};
use health::FetchHealth;
use notification::{load_bell, BellState};
use overlays::{Banner, OverlayController};
use services::dashboard::{DashboardPage, DashboardView};
use state::{with_open_card, DashboardState, MemoryNavigator, Navigator};
use types::{Company, LandingState, Role};

/// Page URL the headless run navigates on.
const PAGE_URL: &str = "http://localhost/dashboard";

/// Overrides on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub company: Option<Company>,
    pub open_card: Option<String>,
    pub role: Option<Role>,
    pub landing_path: Option<PathBuf>,
}

/// Everything one headless dashboard load produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub page_url: String,
    pub view: DashboardView,
    pub bell: BellState,
    pub banner: Banner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceError>,
    pub fetch_health: FetchHealth,
}

fn load_landing(path: &Path) -> Result<LandingState, DashboardError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| DashboardError::Configuration(format!("Invalid landing state: {}", e)))
}

/// Load config, fetch the dashboard, and compose the view once.
pub async fn run(options: RunOptions) -> Result<RunReport, DashboardError> {
    let config = match &options.config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let company = options.company.unwrap_or(config.default_company);
    let role = options.role.unwrap_or(config.role);
    log::info!("Loading dashboard from {} for {} ({:?})", config.api_base_url, company, role);

    let api: Arc<dyn DashboardApi> = Arc::new(ApiClient::from_config(&config)?);

    let landing = match &options.landing_path {
        Some(path) => load_landing(path)?,
        None => LandingState::default(),
    };
    let overlays = OverlayController::start(&landing);

    let url = with_open_card(&Url::parse(PAGE_URL)?, options.open_card.as_deref());
    let state = DashboardState::new(MemoryNavigator::new(url), company);
    let mut page = DashboardPage::new(
        state,
        DashboardDataStore::new(Arc::clone(&api)),
        config.chart_container_height,
    );

    let (_, bell) = tokio::join!(page.load(), load_bell(api.as_ref(), role));

    let error = page.store().snapshot().error;
    if let Some(e) = &error {
        log::warn!("Dashboard data unavailable: {}", e.message);
    }

    let view = page.view();
    log::info!("Composed {} cards", view.cards.len());

    Ok(RunReport {
        page_url: page.state().navigator().current_url().to_string(),
        view,
        bell,
        banner: overlays.banner(),
        error,
        fetch_health: health::snapshot(),
    })
}
