//! aion-live - follows the model performance channel of an AION dashboard
//! backend and logs the board as it changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use aion_live::adapters::{FallbackControlPlane, HttpControlPlane, TungsteniteTransport};
use aion_live::application::{ChannelOptions, LiveChannel, PerformanceView, ServiceConfigView};
use aion_live::config::{AppConfig, LoggingConfig};
use aion_live::domain::channel::ConnectionState;
use aion_live::ports::MlControlPlane;

/// Points kept per chart series in log summaries.
const MAX_POINTS: usize = 100;

/// Pause before re-arming a channel whose reconnect attempts ran out.
const RESTART_BACKOFF: Duration = Duration::from_secs(60);

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    let url = config.endpoints.performance_ws_url();
    tracing::info!(url = %url, "Starting performance channel");

    let view = Arc::new(PerformanceView::new(MAX_POINTS));
    let transport = TungsteniteTransport::new().with_connect_timeout(config.endpoints.request_timeout());
    let channel = LiveChannel::open(
        url,
        ChannelOptions::from(&config.channel),
        Arc::new(transport),
        view.clone(),
    );

    let control_plane: Arc<dyn MlControlPlane> = Arc::new(FallbackControlPlane::new(Arc::new(
        HttpControlPlane::new(&config.endpoints)?,
    )));
    log_control_plane(control_plane).await;

    let mut revisions = view.subscribe();
    let mut states = channel.subscribe_state();
    let mut restart_at: Option<Instant> = None;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                for window in view.window_sizes() {
                    let series = view.series_for_window(window);
                    let latest: Vec<String> = series
                        .iter()
                        .map(|s| match s.latest_mse {
                            Some(mse) => format!("{}={:.4}", s.cell_index, mse),
                            None => format!("{}=n/a", s.cell_index),
                        })
                        .collect();
                    tracing::info!(window, cells = series.len(), latest = %latest.join(" "), "Performance");
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                tracing::info!(
                    state = %state,
                    attempts = channel.reconnect_attempts(),
                    last_error = ?view.last_error(),
                    "Connection state"
                );
                if gave_up(&channel) {
                    tracing::warn!(
                        backoff_secs = RESTART_BACKOFF.as_secs(),
                        "Reconnect attempts exhausted, restarting channel after backoff"
                    );
                    restart_at = Some(Instant::now() + RESTART_BACKOFF);
                }
            }
            _ = wait_until(restart_at) => {
                restart_at = None;
                channel.reconnect();
            }
            _ = &mut shutdown => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    channel.close();
    Ok(())
}

/// Log the ML service config and model registry once at startup.
async fn log_control_plane(control_plane: Arc<dyn MlControlPlane>) {
    let service_config = ServiceConfigView::new(control_plane.clone());
    if service_config.refetch().await.is_ok() {
        if let Some(config) = service_config.config() {
            tracing::info!(analytics_types = ?config.analytics_types(), "ML service config");
        }
    }

    match control_plane.list_models().await {
        Ok(models) => {
            for model in models {
                tracing::info!(
                    model = %model.name,
                    version = ?model.latest_version().map(|v| v.version.as_str()),
                    stage = ?model.latest_version().map(|v| v.stage.as_str()),
                    "Registered model"
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "Model registry unavailable"),
    }
}

/// True once the channel has stopped reconnecting on its own.
fn gave_up(channel: &LiveChannel) -> bool {
    channel.state() == ConnectionState::Closed && !channel.has_pending_reconnect()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_live::adapters::testing::{RecordingObserver, ScriptedTransport};
    use aion_live::ports::CloseReason;

    const DELAY: Duration = Duration::from_secs(3);

    #[tokio::test(start_paused = true)]
    async fn gave_up_only_after_retries_are_exhausted() {
        let transport = ScriptedTransport::new().accept().refuse("down").accept();
        let channel = LiveChannel::open(
            "ws://localhost:5173/pei-ml/ws/performance/status",
            ChannelOptions::default()
                .with_reconnect_delay(DELAY)
                .with_max_reconnect_attempts(1),
            Arc::new(transport.clone()),
            Arc::new(RecordingObserver::new()),
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!gave_up(&channel));

        transport.last_peer().unwrap().close(CloseReason::new(Some(1006), "abnormal"));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!gave_up(&channel), "a reconnect is still pending");

        tokio::time::sleep(DELAY * 3).await;
        assert!(gave_up(&channel));

        channel.reconnect();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!gave_up(&channel));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_pends_without_deadline() {
        let idle = tokio::time::timeout(RESTART_BACKOFF * 2, wait_until(None)).await;
        assert!(idle.is_err());

        let deadline = Instant::now() + RESTART_BACKOFF;
        tokio::time::timeout(RESTART_BACKOFF * 2, wait_until(Some(deadline)))
            .await
            .unwrap();
    }
}
