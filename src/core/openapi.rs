use utoipa::{Modify, OpenApi};

use crate::features::complaints::{
    dtos as complaints_dtos, handlers as complaints_handlers, models as complaints_models,
};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Complaints (public)
        complaints_handlers::list_complaints,
        complaints_handlers::create_complaint,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Complaints
            complaints_models::Department,
            complaints_models::Location,
            complaints_dtos::ComplaintDto,
            complaints_dtos::CreateComplaintDto,
            complaints_dtos::CreateComplaintForm,
        )
    ),
    tags(
        (name = "complaints", description = "Civic complaints and their media"),
    ),
    info(
        title = "Complaints API",
        version = "0.1.0",
        description = "API documentation for the civic complaints service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
