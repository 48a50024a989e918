//! Server-Sent Events stream for a jam room
//!
//! Streams real-time jam events to connected clients. Each jam id is its
//! own room; subscribing to a jam that does not exist is a 404 rather
//! than a silent empty stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use huddle_common::Error;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use super::ApiError;
use crate::db;
use crate::AppContext;

/// GET /jams/:jam_id/events - SSE event stream for one jam room
pub async fn jam_events(
    State(ctx): State<AppContext>,
    Path(jam_id): Path<i64>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    if db::jams::get_jam(&ctx.db, jam_id).await?.is_none() {
        return Err(ApiError(Error::NotFound(format!("idea jam {}", jam_id))));
    }

    debug!("New SSE client connected to jam {}", jam_id);

    let rx = ctx.broadcaster.subscribe(jam_id);

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().event(event.event_type()).data(json))),
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    None
                }
            },
            Err(e) => {
                // Lagged receiver; the client missed events but the
                // stream itself stays up
                warn!("SSE stream error on jam {}: {:?}", jam_id, e);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}
