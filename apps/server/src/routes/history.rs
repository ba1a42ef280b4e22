use actix_web::get;
use actix_web::web::{Data, Json, Path};
use tracing::debug;

use pulse::{LatencyPoint, Period};

use crate::error::AppError;
use crate::state::AppState;

macros_utils::routes! {
    route historical_data,
}

/// `{timestamp, latency}` pairs for `today`, `12h` or `24h`, oldest first.
/// Anything else is served as `12h`.
#[get("/historical-data/{period}")]
pub async fn historical_data(
    state: Data<AppState>,
    period: Path<String>,
) -> Result<Json<Vec<LatencyPoint>>, AppError> {
    let points = state.query.query(&period).await?;
    debug!(
        period = %Period::parse(&period).as_str(),
        count = points.len(),
        "Historical data served"
    );
    Ok(Json(points))
}
