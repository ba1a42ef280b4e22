use actix_web::{HttpResponse, Responder, get};

macros_utils::routes! {
    route health_route,
}

/// Liveness of the server itself, not of the monitored target.
/// The status is the whole answer.
#[get("/")]
pub async fn health_route() -> impl Responder {
    HttpResponse::Ok()
}
