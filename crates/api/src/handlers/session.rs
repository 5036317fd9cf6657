use axum::response::IntoResponse;

use crate::{auth::CurrentSession, error::ApiResult, response::success};

pub async fn get_session(
    CurrentSession(session): CurrentSession,
) -> ApiResult<impl IntoResponse> {
    Ok(success(session))
}
