use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{DonationEvent, DonationEventView};
use super::profile::{DonorProfileSummary, DonorSources};
use super::service::{Clock, DonorProfileService, ProfileServiceError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(flatten)]
    pub sources: DonorSources,
    /// Reference time (RFC 3339 or YYYY-MM-DD); defaults to the service clock.
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub include_activity: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub summary: DonorProfileSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<Vec<DonationEventView>>,
}

/// Router builder exposing the donor profile endpoint.
pub fn profile_router<C>(service: Arc<DonorProfileService<C>>) -> Router
where
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/donors/profile", post(profile_handler::<C>))
        .with_state(service)
}

pub(crate) async fn profile_handler<C>(
    State(service): State<Arc<DonorProfileService<C>>>,
    axum::Json(request): axum::Json<ProfileRequest>,
) -> Response
where
    C: Clock + 'static,
{
    match service.profile(&request.sources, request.now.as_deref()) {
        Ok(profile) => {
            let activity = request.include_activity.then(|| {
                profile
                    .activity()
                    .iter()
                    .map(DonationEvent::to_view)
                    .collect()
            });
            let body = ProfileResponse {
                summary: profile.summary(),
                activity,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error @ ProfileServiceError::InvalidReferenceTime(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
