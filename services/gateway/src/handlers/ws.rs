use std::collections::HashMap;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use market_feed::messages::{parse_request, PricePayload, TradePayload};
use market_feed::{ClientRequest, ConnectionId, FeedMessage};
use types::ids::AssetId;

use crate::state::AppState;

const DEFAULT_TRADES_LIMIT: usize = 20;
const DEFAULT_CANDLES_LIMIT: usize = 100;
const OUTBOUND_BUFFER: usize = 64;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn = state.rooms.register();
    debug!(conn, "websocket connected");

    let (sink, mut stream) = socket.split();

    // Single writer task; every producer funnels through this channel.
    let (tx, rx) = mpsc::channel::<FeedMessage>(OUTBOUND_BUFFER);
    let writer = tokio::spawn(write_loop(sink, rx));

    // Every connection hears the global feed.
    let global_forwarder = forward(state.hub.subscribe_global(), tx.clone());

    // One forwarder per joined room, torn down on leave.
    let mut room_forwarders: HashMap<AssetId, JoinHandle<()>> = HashMap::new();

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                let Some(request) = parse_request(text.as_str()) else {
                    debug!(conn, "unparseable frame dropped");
                    continue;
                };
                handle_request(request, conn, &state, &tx, &mut room_forwarders).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    global_forwarder.abort();
    for (_, task) in room_forwarders.drain() {
        task.abort();
    }
    writer.abort();

    let left = state.rooms.disconnect(conn);
    debug!(conn, rooms = left.len(), "websocket disconnected");
}

async fn handle_request(
    request: ClientRequest,
    conn: ConnectionId,
    state: &AppState,
    tx: &mpsc::Sender<FeedMessage>,
    room_forwarders: &mut HashMap<AssetId, JoinHandle<()>>,
) {
    match request {
        ClientRequest::JoinRoom { asset_id } => {
            if state.rooms.join(conn, &asset_id) {
                room_forwarders
                    .entry(asset_id.clone())
                    .or_insert_with(|| forward(state.hub.subscribe_room(&asset_id), tx.clone()));
            }

            // A late joiner is consistent immediately: snapshot plus the
            // recent history, before any live update arrives.
            match state.engine.ensure_price(&asset_id).await {
                Ok(price_state) => {
                    let _ = tx
                        .send(FeedMessage::Price(PricePayload::from_state(&price_state)))
                        .await;
                }
                Err(err) => {
                    let _ = tx
                        .send(FeedMessage::TradeError {
                            asset_id: asset_id.clone(),
                            message: err.to_string(),
                        })
                        .await;
                    return;
                }
            }
            send_trades(&asset_id, DEFAULT_TRADES_LIMIT, state, tx).await;
            send_candles(&asset_id, DEFAULT_CANDLES_LIMIT, state, tx).await;
        }

        ClientRequest::LeaveRoom { asset_id } => {
            state.rooms.leave(conn, &asset_id);
            if let Some(task) = room_forwarders.remove(&asset_id) {
                task.abort();
            }
        }

        ClientRequest::GetTrades { asset_id, limit } => {
            send_trades(&asset_id, limit.unwrap_or(DEFAULT_TRADES_LIMIT), state, tx).await;
        }

        ClientRequest::GetCandles { asset_id, limit } => {
            send_candles(&asset_id, limit.unwrap_or(DEFAULT_CANDLES_LIMIT), state, tx).await;
        }

        ClientRequest::Ping => {
            let _ = tx.send(FeedMessage::Pong).await;
        }
    }
}

async fn send_trades(
    asset: &AssetId,
    limit: usize,
    state: &AppState,
    tx: &mpsc::Sender<FeedMessage>,
) {
    let message = match state.engine.get_recent_trades(asset, limit).await {
        Ok(trades) => FeedMessage::Trades {
            trades: trades.iter().map(TradePayload::from_history).collect(),
        },
        Err(err) => FeedMessage::TradeError {
            asset_id: asset.clone(),
            message: err.to_string(),
        },
    };
    let _ = tx.send(message).await;
}

async fn send_candles(
    asset: &AssetId,
    limit: usize,
    state: &AppState,
    tx: &mpsc::Sender<FeedMessage>,
) {
    let message = match state.engine.get_candlesticks(asset, limit).await {
        Ok(candles) => FeedMessage::ChartData { candles },
        Err(err) => FeedMessage::ChartError {
            asset_id: asset.clone(),
            message: err.to_string(),
        },
    };
    let _ = tx.send(message).await;
}

async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<FeedMessage>,
) {
    while let Some(message) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&message) else {
            continue;
        };
        if sink.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Bridge a broadcast subscription into the connection's outbound queue
fn forward(
    mut rx: broadcast::Receiver<FeedMessage>,
    tx: mpsc::Sender<FeedMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    if tx.send(message).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "slow websocket consumer dropped feed messages");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
