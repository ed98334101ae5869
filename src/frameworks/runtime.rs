// Framework bootstrap for the headless display segment.

use crate::frameworks::config;
use crate::interface_adapters::clients::AuthorityClient;
use crate::interface_adapters::navigation::WatchNavigator;
use crate::use_cases::{SegmentHandle, ViewEvent, fetch_total_segments};

use std::io::Result;
use std::sync::Arc;
use tokio::sync::broadcast;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Runs one segment view against the authority until ctrl-c or a lobby redirect.
pub async fn run(authority: AuthorityClient) -> Result<()> {
    let settings = config::segment_settings();
    let window = config::window_size(&settings.tuning);
    let route = config::route();

    match fetch_total_segments(&authority).await {
        Ok(total_segments) => tracing::info!(total_segments, "authority reachable"),
        // The view retries on its own; an unreachable authority at startup is not fatal.
        Err(error) => tracing::warn!(%error, "authority not reachable yet"),
    }

    let (navigator, mut route_rx) = WatchNavigator::new();
    let view = SegmentHandle::spawn(
        Arc::new(authority),
        Arc::new(navigator),
        settings,
        route,
        window,
    );
    let mut events = view.subscribe();
    let mut frames = view.frames();

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(error) = signal {
                    tracing::error!(%error, "failed to listen for ctrl-c");
                }
                tracing::info!("shutting down");
                break;
            }
            changed = route_rx.changed() => {
                if changed.is_err() || route_rx.borrow().is_some() {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(ViewEvent::ShotFired { segment }) => tracing::info!(segment, "shot"),
                Ok(ViewEvent::EnemyDestroyed { enemy_id, effect_origin }) => {
                    tracing::info!(
                        %enemy_id,
                        x = effect_origin.x,
                        y = effect_origin.y,
                        "boom"
                    );
                }
                Ok(ViewEvent::RedirectedToLobby { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "view events lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update();
                tracing::debug!(
                    tick = frame.tick,
                    players = frame.players.len(),
                    enemies = frame.enemies.len(),
                    bullets = frame.bullets.len(),
                    effects = frame.effects.len(),
                    transform = %frame.viewport.css_transform(),
                    "frame"
                );
            }
        }
    }

    let left_for = route_rx.borrow().clone();
    if let Some(route) = left_for {
        tracing::info!(%route, "left segment view");
    }
    view.teardown().await;
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let base_url = config::authority_url();
    let timeout = config::authority_timeout();
    let authority = AuthorityClient::new(&base_url, timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize authority client: {e}")))?;
    tracing::debug!(
        authority_url = %base_url,
        authority_timeout_ms = timeout.as_millis(),
        "authority client configured"
    );

    run(authority).await
}
