//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    ErrorResponse,
    upload::{UploadForm, UploadResponse},
};
use crate::domain::ObjectDescriptor;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bucket Gateway API",
        version = "1.0.0",
        description = "List and upload objects in an S3 bucket",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "Liveness endpoints"),
        (name = "objects", description = "Bucket listing and upload endpoints")
    ),
    paths(
        crate::api::handlers::health::ping,
        crate::api::handlers::objects::list_images,
        crate::api::handlers::objects::list_data,
        crate::api::handlers::upload::upload_file,
    ),
    components(
        schemas(
            ObjectDescriptor,
            ErrorResponse,
            UploadForm,
            UploadResponse,
        )
    )
)]
pub struct ApiDoc;
