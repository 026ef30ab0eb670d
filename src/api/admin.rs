//! Admin login endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::auth::verify_password;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResult};
use crate::AppState;

/// POST /api/admin/login - Check the admin password.
///
/// 401 on mismatch, 500 when no master password is configured.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResult>, AppError> {
    let Json(request) =
        payload.map_err(|_| AppError::BadRequest("Invalid request body.".to_string()))?;

    let result = verify_password(state.config.master_password.as_deref(), &request.password)?;
    Ok(Json(result))
}
