//! # wattdesk — headless energy console
//!
//! Composition root that wires the HTTP adapter into the application layer.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Sign in with configured credentials, or resume the stored token
//! - Report the signed-in user, device statistics and every record page
//! - Run the dashboard poller and log each update until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no presentation logic belongs here.

mod config;

use anyhow::Context;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tracing_subscriber::EnvFilter;

use wattdesk_adapter_http_reqwest::{ApiClient, Resource, RestSource, TokenStore, UserSource};
use wattdesk_app::bindings;
use wattdesk_app::dashboard::{overview_tiles, summary_cards};
use wattdesk_app::poller::{DashboardPoller, DashboardState, PollPhase};
use wattdesk_app::ports::RecordSource;
use wattdesk_app::view_model::RecordListViewModel;
use wattdesk_domain::device::{
    AirConditioner, Battery, DeviceKind, ElectricVehicle, Generator, Heater, SolarPanel,
};
use wattdesk_domain::user::Access;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = ApiClient::new(&config.api).context("building HTTP client")?;
    let tokens = TokenStore::new(&config.auth.token_file);
    let client = sign_in(client, &config, &tokens).await?;

    let access = report_session(&client).await;
    report_pages(&client, access).await;

    let poller = DashboardPoller::start(client, config.poller());
    let mut updates = WatchStream::new(poller.subscribe());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(state) = updates.next() => {
                log_dashboard(&state);
                if state.phase == PollPhase::Halted {
                    break;
                }
            }
            result = &mut shutdown => {
                result.context("waiting for Ctrl-C")?;
                tracing::info!("shutting down");
                break;
            }
        }
    }

    poller.stop();
    Ok(())
}

/// Authenticate `client`: fresh credentials win over a stored token, and a
/// stored token the server rejects is forgotten.
async fn sign_in(client: ApiClient, config: &Config, tokens: &TokenStore) -> anyhow::Result<ApiClient> {
    if let Some(credentials) = config.credentials() {
        let pair = client
            .login(&credentials)
            .await
            .with_context(|| format!("signing in as {}", credentials.username))?;
        tokens.store(&pair.access)?;
        tracing::info!(username = %credentials.username, "signed in");
        return Ok(client.with_token(pair.access));
    }

    let Some(token) = tokens.load()? else {
        tracing::info!("no stored token, continuing signed out");
        return Ok(client);
    };
    match client.verify_token(&token).await {
        Ok(()) => Ok(client.with_token(token)),
        Err(err) => {
            tracing::warn!(error = %err, "stored token rejected, signing out");
            tokens.clear()?;
            Ok(client)
        }
    }
}

/// Log who is signed in and the device counts. Returns the session's write
/// privilege.
async fn report_session(client: &ApiClient) -> Access {
    if client.token().is_none() {
        return Access::ReadOnly;
    }
    let access = match client.me().await {
        Ok(user) => {
            tracing::info!(
                username = %user.username,
                role = user.role_label(),
                devices = user.device_count,
                "session"
            );
            Access::for_user(&user)
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to fetch current user");
            Access::ReadOnly
        }
    };
    match client.device_stats().await {
        Ok(stats) => tracing::info!(
            total = stats.total,
            online = stats.online,
            offline = stats.offline,
            error = stats.error,
            "online {:.0}%",
            stats.online_percentage()
        ),
        Err(err) => tracing::warn!(error = %err, "failed to fetch device stats"),
    }
    access
}

/// Load every record page once and log its cards.
async fn report_pages(client: &ApiClient, access: Access) {
    for kind in DeviceKind::ALL {
        match kind {
            DeviceKind::Battery => report_kind::<Battery>(client, kind, access).await,
            DeviceKind::ElectricVehicle => report_kind::<ElectricVehicle>(client, kind, access).await,
            DeviceKind::SolarPanel => report_kind::<SolarPanel>(client, kind, access).await,
            DeviceKind::Generator => report_kind::<Generator>(client, kind, access).await,
            DeviceKind::AirConditioner => report_kind::<AirConditioner>(client, kind, access).await,
            DeviceKind::Heater => report_kind::<Heater>(client, kind, access).await,
        }
    }
    let users = UserSource::new(client.clone(), access);
    report_page(&RecordListViewModel::new(users, bindings::users::schema(), access)).await;
}

/// Report one device page decoded as its own variant.
async fn report_kind<R>(client: &ApiClient, kind: DeviceKind, access: Access)
where
    RestSource<R>: RecordSource,
{
    let source = RestSource::<R>::new(client.clone(), Resource::for_kind(kind));
    report_page(&RecordListViewModel::new(source, bindings::for_kind(kind), access)).await;
}

async fn report_page<S: RecordSource>(page: &RecordListViewModel<S>) {
    page.load().await;
    let title = page.schema().title;
    if let Some(error) = page.error() {
        tracing::warn!(page = title, %error, "page unavailable");
        return;
    }
    let cards = page.cards();
    if cards.is_empty() {
        tracing::info!(page = title, "{}", page.schema().empty_message);
        return;
    }
    tracing::info!(page = title, count = cards.len(), editable = page.can_edit(), "page loaded");
    for card in cards {
        let rows: Vec<String> = card
            .rows
            .iter()
            .map(|row| format!("{}: {}", row.label, row.value))
            .collect();
        tracing::debug!(
            page = title,
            id = %card.id,
            badge = card.badge.as_deref().unwrap_or("-"),
            owner = card.owner.as_deref().unwrap_or("-"),
            updated = %card.updated,
            "{} | {}",
            card.title,
            rows.join(", ")
        );
    }
}

fn log_dashboard(state: &DashboardState) {
    match state.phase {
        PollPhase::Loading => tracing::info!("loading dashboard"),
        PollPhase::Halted => {
            tracing::error!(error = state.error.as_deref().unwrap_or_default(), "dashboard halted");
        }
        PollPhase::Polling => {
            if let Some(error) = &state.error {
                tracing::warn!(%error, failures = state.consecutive_failures, "dashboard refresh failed");
            }
            let Some(data) = &state.data else {
                return;
            };
            let tiles: Vec<String> = overview_tiles(&data.snapshot)
                .into_iter()
                .map(|tile| match tile.subtitle {
                    Some(subtitle) => format!("{} {}{} ({subtitle})", tile.label, tile.value, tile.unit),
                    None => format!("{} {}{}", tile.label, tile.value, tile.unit),
                })
                .collect();
            tracing::info!(
                updated = ?state.last_updated,
                devices = data.devices.len(),
                "{}",
                tiles.join(" | ")
            );
            if let Some(flow) = state.flow() {
                let rows: Vec<String> = flow
                    .rows()
                    .iter()
                    .map(|(label, watts)| format!("{label} {watts:.0}W"))
                    .collect();
                tracing::debug!(grid = flow.grid.label(), "{}", rows.join(" | "));
            }
            for card in summary_cards(&data.devices) {
                tracing::debug!(
                    kind = card.type_label,
                    status = %card.status_label,
                    active = card.active,
                    "{}",
                    card.name
                );
            }
        }
    }
}
