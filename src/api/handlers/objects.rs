//! Object listing endpoints

use actix_web::{web, HttpResponse};
use tracing::{error, info};

use crate::AppState;
use crate::api::handlers::{internal_error, ErrorResponse};
use crate::domain::{Collection, ObjectDescriptor};

/// GET /api/images - List objects under `images/`
#[utoipa::path(
    get,
    path = "/api/images",
    tag = "objects",
    responses(
        (status = 200, description = "Objects under images/", body = Vec<ObjectDescriptor>),
        (status = 500, description = "Bucket listing failed", body = ErrorResponse)
    )
)]
pub async fn list_images(state: web::Data<AppState>) -> HttpResponse {
    list_collection(&state, Collection::Images).await
}

/// GET /api/data - List objects under `data/`
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "objects",
    responses(
        (status = 200, description = "Objects under data/", body = Vec<ObjectDescriptor>),
        (status = 500, description = "Bucket listing failed", body = ErrorResponse)
    )
)]
pub async fn list_data(state: web::Data<AppState>) -> HttpResponse {
    list_collection(&state, Collection::Data).await
}

async fn list_collection(state: &AppState, collection: Collection) -> HttpResponse {
    match state.gallery.list(collection.prefix()).await {
        Ok(objects) => {
            info!(collection = %collection, count = objects.len(), "Listed collection");
            HttpResponse::Ok().json(objects)
        }
        Err(e) => {
            error!(collection = %collection, error = %e, "Bucket listing failed");
            internal_error(collection.failure_message())
        }
    }
}
