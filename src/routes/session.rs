use axum::http::{HeaderMap, StatusCode};

use crate::error::{ApiError, detail};
use crate::models::Session;

// ============================
// Helper: Extract Session
// ============================
pub fn extract_session(headers: &HeaderMap) -> Result<Session, ApiError> {
    Session::from_headers(headers)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))
}

pub fn extract_admin_session(headers: &HeaderMap) -> Result<Session, ApiError> {
    let session = extract_session(headers)?;
    if !session.is_admin() {
        return Err(detail(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(session)
}
