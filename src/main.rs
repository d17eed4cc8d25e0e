//! Arena Client - headless demo runner
//!
//! Wires one local player session to a loopback authority:
//! - A seeded bot feeds key edges
//! - Outbound intents are encoded to JSON and answered the way a room server would
//! - Rendering goes to the log

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_client::app::{session_channels, InputBot, Session};
use arena_client::config::Config;
use arena_client::game::actor::{Actor, RenderSurface};
use arena_client::game::collision::TileMap;
use arena_client::game::{LocalPlayerController, PlayerTuning};
use arena_client::util::time::SystemClock;
use arena_client::ws::channel::{decode_inbound, encode_outbound, ChannelSink};
use arena_client::ws::protocol::{ClientMsg, Position, ServerMsg};

const ARENA_COLS: usize = 15;
const ARENA_ROWS: usize = 13;
const TILE_SIZE: f32 = 32.0;
const BOT_PACE: Duration = Duration::from_millis(400);
const FUSE: Duration = Duration::from_millis(2000);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    info!("Starting Arena Client");
    info!(player = %config.player_name, index = config.player_index, "Local player");

    let tuning = PlayerTuning::default();
    let (sink, outbound_rx) = ChannelSink::pair();
    let spawn = Position {
        x: config.spawn_x,
        y: config.spawn_y,
    };
    let actor = Actor::new(config.player_name.as_str(), config.player_index, spawn, &tuning);
    let controller =
        LocalPlayerController::new(actor, tuning, Arc::new(SystemClock), Box::new(sink));

    let map = TileMap::arena(ARENA_COLS, ARENA_ROWS, TILE_SIZE);
    let session = Session::new(
        controller,
        Some(map),
        Box::new(LogSurface),
        tuning,
        config.frame_interval,
    );

    let (handle, inbox) = session_channels(64);

    // Loopback authority
    let authority = tokio::spawn(run_authority(
        config.player_name.clone(),
        outbound_rx,
        handle.inbound_tx.clone(),
    ));

    // Input source
    let bot = tokio::spawn(InputBot::new(config.bot_seed).run(handle.input_tx.clone(), BOT_PACE));

    let session_task = tokio::spawn(session.run(inbox));

    tokio::select! {
        _ = tokio::time::sleep(config.run_for) => {
            info!("Run time elapsed, stopping session");
        }
        _ = shutdown_signal() => {}
    }
    handle.shutdown();

    let report = session_task.await?;
    bot.abort();
    authority.abort();

    info!(
        frames = report.frames,
        x = report.position.x,
        y = report.position.y,
        alive = report.alive,
        life = report.life,
        "Arena Client stopped"
    );
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Surface that logs every style update
struct LogSurface;

impl RenderSurface for LogSurface {
    fn update_style(&mut self, owner: &str, style: &str) {
        debug!(target: "arena_client::render", owner, style, "Draw");
    }

    fn remove(&mut self, owner: &str) {
        debug!(target: "arena_client::render", owner, "Remove");
    }
}

/// Stand-in for the room server. Answers go through the same JSON path a
/// socket would use.
async fn run_authority(
    local: String,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientMsg>,
    inbound_tx: mpsc::Sender<ServerMsg>,
) {
    let ghost = format!("{local}-ghost");
    let script = [
        r#"{"type":"lock"}"#.to_string(),
        format!(r#"{{"type":"join","sender":"{ghost}","index":1,"position":{{"x":416,"y":352}}}}"#),
        r#"{"type":"spawnBonus","data":{"bonus":"speed","indexX":2,"indexY":1}}"#.to_string(),
        r#"{"type":"spawnBonus","data":{"bonus":"bomb","indexX":1,"indexY":2}}"#.to_string(),
        r#"{"type":"unlock"}"#.to_string(),
    ];
    for text in &script {
        deliver(&inbound_tx, text).await;
    }

    while let Some(msg) = outbound_rx.recv().await {
        let text = match encode_outbound(&msg) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode intent");
                continue;
            }
        };
        info!(target: "arena_client::wire", kind = msg.kind(), %text, "Intent");

        match msg {
            ClientMsg::Move {
                direction,
                position,
                ..
            } => {
                // mirrored shadow of the local player
                let reply = format!(
                    r#"{{"type":"move","sender":"{ghost}","direction":"{}","position":{{"x":{},"y":{}}}}}"#,
                    direction.as_str(),
                    TILE_SIZE * (ARENA_COLS as f32) - position.x,
                    position.y,
                );
                deliver(&inbound_tx, &reply).await;
            }
            ClientMsg::Bomb { sender, .. } => {
                let tx = inbound_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(FUSE).await;
                    let reply = format!(r#"{{"type":"bombExploded","sender":"{sender}"}}"#);
                    deliver(&tx, &reply).await;
                });
            }
            ClientMsg::Bonus { .. } => {
                // fan the pickup back out so the cell is invalidated
                deliver(&inbound_tx, &text).await;
            }
            ClientMsg::Degats { .. } | ClientMsg::Death { .. } => {}
        }
    }
    debug!("Outbound channel closed, authority stopping");
}

async fn deliver(inbound_tx: &mpsc::Sender<ServerMsg>, text: &str) {
    match decode_inbound(text) {
        Ok(msg) => {
            if inbound_tx.send(msg).await.is_err() {
                debug!("Session gone, dropping server message");
            }
        }
        Err(e) => warn!(error = %e, "Failed to decode server message"),
    }
}

/// Ctrl+C / SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping");
        }
    }
}
