use crate::domain::book::LoginData;
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{instrument, warn};

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginData>,
) -> Result<HttpResponse, ApiError> {
    let token = state.auth.login(req.into_inner()).map_err(|e| {
        warn!(error = %e, "Login failed");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
