use crate::handlers::{trade, ws};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/trades/buy", post(trade::buy))
        .route("/trades/sell", post(trade::sell))
        .route("/assets/{asset_id}/trades", get(trade::recent_trades))
        .route("/assets/{asset_id}/candles", get(trade::candle_series))
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
