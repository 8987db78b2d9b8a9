//! GET /api/events: the change feed as Server-Sent Events.
//!
//! Each change is one `change` event whose data is the JSON
//! [`ChangeEvent`](crate::events::ChangeEvent). A subscriber that lags
//! behind skips the missed events and keeps streaming. Every stream ends
//! when the server starts shutting down.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::AppState;

/// GET /api/events
pub async fn stream_events(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.feed.subscribe();
    info!(
        user_id = %user.id,
        subscribers = state.feed.subscriber_count(),
        "Change feed subscriber connected"
    );

    let changes = BroadcastStream::new(receiver).filter_map(|received| match received {
        Ok(change) => Some(Event::default().event("change").json_data(&change)),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "Change feed subscriber lagged");
            None
        }
    });
    // Ends with the server
    let stream = futures_util::StreamExt::take_until(changes, state.shutdown.wait());

    Sse::new(stream).keep_alive(KeepAlive::default())
}
