use actix_web::http::header;
use actix_web::web::{Bytes, Data};
use actix_web::{HttpResponse, get};
use chrono::SecondsFormat;
use futures::stream;
use serde::Serialize;
use tracing::info;

use pulse::Outcome;

use crate::state::AppState;

macros_utils::routes! {
    route status_stream,
}

/// JSON payload of one server-sent event
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent<'a> {
    status: String,
    status_code: Option<u16>,
    latency: i64,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> From<&'a Outcome> for StatusEvent<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        Self {
            status: outcome.status().to_string(),
            status_code: outcome.status_code(),
            latency: outcome.latency_ms(),
            timestamp: outcome.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
            error: outcome.error(),
        }
    }
}

fn encode_event(outcome: &Outcome) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_string(&StatusEvent::from(outcome))?;
    Ok(Bytes::from(format!("data: {json}\n\n")))
}

/// One `data:` event per check for as long as the client stays connected.
///
/// Closing the connection drops the subscription; the distributor forgets
/// it on its next publish.
#[get("/status-stream")]
pub async fn status_stream(state: Data<AppState>) -> HttpResponse {
    let subscription = state.distributor.subscribe();
    info!(subscriber = %subscription.id(), "Live stream opened");

    let events = stream::unfold(subscription, |mut subscription| async move {
        let outcome = subscription.recv().await?;
        Some((encode_event(&outcome), subscription))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events)
}
