use axum::Json;
use serde::Serialize;
use sync_board::route;
use utoipa::ToSchema;

const STEPS: [&str; 2] = ["1. create a page", "2. Add boards to page"];

#[derive(Serialize, ToSchema)]
pub struct LandingResponse {
    pub steps: Vec<String>,
    pub create_route: String,
}

/// Onboarding
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Onboarding steps", body = LandingResponse)
    )
)]
pub async fn get_landing() -> Json<LandingResponse> {
    Json(LandingResponse {
        steps: STEPS.iter().map(|s| s.to_string()).collect(),
        create_route: route::CREATE.to_string(),
    })
}
