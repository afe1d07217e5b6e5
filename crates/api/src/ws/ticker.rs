//! Market ticker: periodic broadcast of recent sales activity.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, Utf8Bytes};
use spectra_db::repositories::TransactionRepo;
use spectra_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Interval between ticker broadcasts (in seconds).
const TICKER_INTERVAL_SECS: u64 = 15;

/// Spawn a background task that broadcasts a market ticker frame to every
/// WebSocket client every 15 seconds.
///
/// Each frame is a JSON object with the broadcast timestamp and the number
/// of sales in the trailing hour. Runs until the cancellation token fires.
pub fn start_ticker(
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(TICKER_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                () = cancel.cancelled() => {
                    tracing::info!("Market ticker stopped");
                    return;
                }
            }

            // Skip the broadcast entirely when nobody is listening.
            if ws_manager.connection_count().await == 0 {
                continue;
            }

            let hour_ago = chrono::Utc::now() - chrono::Duration::hours(1);
            let sales_last_hour = match TransactionRepo::count_sales_since(&pool, hour_ago).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(error = %e, "Ticker query failed, skipping broadcast");
                    continue;
                }
            };

            let frame = serde_json::json!({
                "type": "stats",
                "t": chrono::Utc::now().to_rfc3339(),
                "salesLastHour": sales_last_hour,
            });
            ws_manager
                .broadcast(Message::Text(Utf8Bytes::from(frame.to_string())))
                .await;
        }
    })
}
