//! HTTP surface: the landing page, the WebSocket upgrade, and server startup

use crate::broadcaster::{BroadcastHandle, Broadcaster};
use crate::config::ServerConfig;
use crate::error::{BoxError, ServerError};
use crate::handler::ConnectionHandler;
use crate::round::RoundState;
use crate::scheduler::RoundScheduler;
use crate::scores::ScoreLedger;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::{future, SinkExt, StreamExt};
use log::{info, warn};
use shared::{Message, PuzzleSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const LANDING_PAGE: &str = "Welcome to the Chat Room!";

/// Shared handles given to every request
#[derive(Clone)]
pub struct AppState {
    pub round: Arc<RoundState>,
    pub scores: Arc<ScoreLedger>,
    pub outbox: BroadcastHandle,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

async fn home_page() -> &'static str {
    LANDING_PAGE
}

/// A failed handshake is logged and answered with the rejection; nothing is
/// registered for it.
async fn ws_upgrade(
    State(state): State<AppState>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match upgrade {
        Ok(upgrade) => upgrade
            .on_failed_upgrade(|e| warn!("WebSocket upgrade failed: {}", e))
            .on_upgrade(move |socket| handle_socket(socket, state)),
        Err(rejection) => {
            warn!("Rejected WebSocket handshake: {}", rejection);
            rejection.into_response()
        }
    }
}

/// Registers the write half with the broadcaster and runs the guess handler
/// on the read half until the participant goes away.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (writer, reader) = socket.split();

    let sink = writer
        .sink_map_err(|e| -> BoxError { Box::new(e) })
        .with(|text: String| future::ready(Ok::<_, BoxError>(WsMessage::Text(text.into()))));
    let id = state.outbox.register(Box::pin(sink));

    let inbound = reader
        .take_while(|frame| future::ready(!matches!(frame, Ok(WsMessage::Close(_)))))
        .filter_map(|frame| future::ready(decode_frame(frame)));

    ConnectionHandler::new(id, state.round, state.scores, state.outbox)
        .run(Box::pin(inbound))
        .await;
}

/// Text and binary frames must carry a JSON [`Message`]. Control frames are
/// skipped.
fn decode_frame(frame: Result<WsMessage, axum::Error>) -> Option<Result<Message, BoxError>> {
    let decoded: serde_json::Result<Message> = match frame {
        Ok(WsMessage::Text(text)) => serde_json::from_str(text.as_str()),
        Ok(WsMessage::Binary(bytes)) => serde_json::from_slice(&bytes),
        Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) | Ok(WsMessage::Close(_)) => return None,
        Err(e) => return Some(Err(Box::new(e))),
    };
    Some(decoded.map_err(|e| -> BoxError { Box::new(e) }))
}

/// Binds the listener and starts the broadcaster, the round timers and the
/// HTTP server. Returns the bound address (useful with port 0) and the
/// server task.
///
/// A bind failure is the only startup error that reaches the caller after
/// configuration has been validated.
pub async fn start(
    config: ServerConfig,
) -> Result<(SocketAddr, JoinHandle<Result<(), ServerError>>), ServerError> {
    let puzzles = config.load_puzzles()?;
    start_with_puzzles(config, puzzles).await
}

/// Like [`start`], with a catalogue supplied by the caller instead of the
/// configured one.
pub async fn start_with_puzzles(
    config: ServerConfig,
    puzzles: PuzzleSet,
) -> Result<(SocketAddr, JoinHandle<Result<(), ServerError>>), ServerError> {
    config.validate()?;
    let puzzles = Arc::new(puzzles);
    let addr = config.socket_addr()?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })?;

    let (broadcaster, outbox) = Broadcaster::new();
    tokio::spawn(broadcaster.run());

    let round = Arc::new(RoundState::new());
    let scores = Arc::new(ScoreLedger::new());

    let mut scheduler = RoundScheduler::new(
        Arc::clone(&puzzles),
        Arc::clone(&round),
        Arc::clone(&scores),
        outbox.clone(),
        config.round_interval,
    );
    if let Some(seed) = config.seed {
        scheduler = scheduler.with_seed(seed);
    }
    scheduler.spawn();

    info!(
        "Server listening on {} ({} puzzles, {:?} rounds)",
        local_addr,
        puzzles.len(),
        config.round_interval
    );

    let app = router(AppState {
        round,
        scores,
        outbox,
    });
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|source| ServerError::Serve {
                addr: local_addr,
                source,
            })
    });

    Ok((local_addr, server))
}
