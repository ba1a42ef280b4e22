use actix_web::get;
use actix_web::web::{Data, Json, Path};
use serde::Serialize;

use pulse::Period;

use crate::error::AppError;
use crate::state::AppState;

macros_utils::routes! {
    route uptime_summary,
}

/// The two uptime figures are independent and reported side by side
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeReport {
    period: &'static str,
    /// Over the last `window_size` outcomes
    recent_uptime: f64,
    window_size: usize,
    window_capacity: usize,
    /// Over every ledger record in `period`
    ledger_uptime: f64,
}

#[get("/uptime/{period}")]
pub async fn uptime_summary(
    state: Data<AppState>,
    period: Path<String>,
) -> Result<Json<UptimeReport>, AppError> {
    let period = Period::parse(&period);

    Ok(Json(UptimeReport {
        period: period.as_str(),
        recent_uptime: state.history.recent_uptime().await,
        window_size: state.history.window_snapshot().await.len(),
        window_capacity: state.history.window_capacity().await,
        ledger_uptime: state.query.uptime(period).await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support;
    use actix_web::{App, test};
    use chrono::{Duration as ChronoDuration, Utc};
    use pulse::Outcome;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    #[actix_web::test]
    async fn test_empty_history_is_optimistic() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::state(&dir).await;
        let app =
            test::init_service(App::new().app_data(Data::new(state)).configure(super::routes))
                .await;

        let req = test::TestRequest::get().uri("/uptime/today").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["period"], "today");
        assert_eq!(body["recentUptime"], 100.0);
        assert_eq!(body["ledgerUptime"], 100.0);
        assert_eq!(body["windowSize"], 0);
    }

    #[actix_web::test]
    async fn test_window_and_ledger_uptime_differ() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::state(&dir).await;
        let now = Utc::now();
        // Window capacity is 4: the two early failures fall out of it
        for (i, code) in [500, 500, 200, 200, 200, 200].into_iter().enumerate() {
            let at = now - ChronoDuration::minutes(10 - i as i64);
            let outcome = Outcome::from_response(code, Duration::from_millis(10), at);
            state.history.append(Arc::new(outcome)).await.unwrap();
        }
        let app =
            test::init_service(App::new().app_data(Data::new(state)).configure(super::routes))
                .await;

        let req = test::TestRequest::get().uri("/uptime/nonsense").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["period"], "12h");
        assert_eq!(body["recentUptime"], 100.0);
        assert_eq!(body["windowSize"], 4);
        assert_eq!(body["windowCapacity"], 4);
        let ledger = body["ledgerUptime"].as_f64().unwrap();
        assert!((ledger - 66.666).abs() < 0.01, "ledger uptime was {ledger}");
    }
}
