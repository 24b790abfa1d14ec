//! Typed REST endpoints.
//!
//! Each helper builds an [`ApiRequest`] and decodes the response; auth,
//! timeouts, and error normalization are handled by [`ApiClient`].

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::client::{ApiClient, ApiError, ApiRequest};
use super::types::{
    AuthTokenBody, Notification, NotificationFilter, NotificationListBody, RegistrationRequest, SessionRating,
    SocialCallbackBody, UnreadCountBody, VideoRoom,
};

fn notification_endpoint(id: &str) -> String {
    format!("/notifications/{id}")
}

fn notification_read_endpoint(id: &str) -> String {
    format!("/notifications/{id}/read")
}

fn session_rate_endpoint(session_id: &str) -> String {
    format!("/scheduling/sessions/{session_id}/rate/")
}

fn session_video_room_endpoint(session_id: &str) -> String {
    format!("/scheduling/sessions/{session_id}/video-room/")
}

const SOCIAL_CALLBACK_ENDPOINT: &str = "/auth/social/callback/";
const REGISTER_ENDPOINT: &str = "/auth/register/";

fn notification_list_request(filter: &NotificationFilter) -> ApiRequest {
    let mut request = ApiRequest::get("/notifications");
    if filter.unread_only {
        request = request.query("unread_only", "true");
    }
    if let Some(kind) = filter.kind.as_deref().filter(|k| !k.is_empty()) {
        request = request.query("type", kind);
    }
    request
}

/// Fetch notifications via `GET /notifications`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body is not a list.
pub async fn fetch_notifications(api: &ApiClient, filter: &NotificationFilter) -> Result<Vec<Notification>, ApiError> {
    let body: NotificationListBody = api.send_json(notification_list_request(filter)).await?;
    Ok(body.into_items())
}

/// Fetch the unread count via `GET /notifications/unread-count`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or the body is not a count.
pub async fn fetch_unread_count(api: &ApiClient) -> Result<u32, ApiError> {
    let body: UnreadCountBody = api.send_json(ApiRequest::get("/notifications/unread-count")).await?;
    Ok(body.count())
}

/// Mark one notification read via `POST /notifications/{id}/read`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn mark_notification_read(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.send_empty(ApiRequest::post(notification_read_endpoint(id))).await
}

/// Mark every notification read via `POST /notifications/read-all`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn mark_all_notifications_read(api: &ApiClient) -> Result<(), ApiError> {
    api.send_empty(ApiRequest::post("/notifications/read-all")).await
}

/// Delete one notification via `DELETE /notifications/{id}`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn delete_notification(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.send_empty(ApiRequest::delete(notification_endpoint(id))).await
}

/// Delete all read notifications via `DELETE /notifications/read`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn clear_read_notifications(api: &ApiClient) -> Result<(), ApiError> {
    api.send_empty(ApiRequest::delete("/notifications/read")).await
}

/// Rate a completed mentoring session.
///
/// # Errors
///
/// Returns [`ApiError`] without sending anything if `rating` is outside 1–5,
/// otherwise if the request fails.
pub async fn rate_session(api: &ApiClient, session_id: &str, rating: u8, feedback: &str) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::invalid_request(format!("rating must be between 1 and 5, got {rating}")));
    }
    let body = SessionRating { rating, feedback: feedback.trim().to_owned() };
    let request = ApiRequest::post(session_rate_endpoint(session_id)).json(&body)?;
    api.send_empty(request).await
}

/// Look up the video room for a session.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or no room URL is returned.
pub async fn fetch_video_room(api: &ApiClient, session_id: &str) -> Result<VideoRoom, ApiError> {
    let room: VideoRoom = api.send_json(ApiRequest::get(session_video_room_endpoint(session_id))).await?;
    if room.room_url.is_empty() {
        return Err(ApiError::new("video room is not available yet"));
    }
    Ok(room)
}

/// Exchange a social-login authorization code.
///
/// The request is public: a 401 here means the code was rejected, not that
/// an existing session expired.
pub(crate) async fn exchange_social_code(
    api: &ApiClient,
    code: &str,
    state: &str,
) -> Result<SocialCallbackBody, ApiError> {
    let request = ApiRequest::post(SOCIAL_CALLBACK_ENDPOINT)
        .json(&serde_json::json!({ "code": code, "state": state }))?
        .public();
    api.send_json(request).await
}

/// Create an account from completed signup data. Public, like the callback.
pub(crate) async fn register_account(api: &ApiClient, request: &RegistrationRequest) -> Result<AuthTokenBody, ApiError> {
    let request = ApiRequest::post(REGISTER_ENDPOINT).json(request)?.public();
    api.send_json(request).await
}
