//! Liveness endpoint

use actix_web::HttpResponse;

/// GET /ping - Liveness check, independent of the bucket
#[utoipa::path(
    get,
    path = "/ping",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("pong")
}
