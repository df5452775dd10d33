//! Catalog login flow
//!
//! `/login` sends the browser to Spotify with a one-time `state`; Spotify
//! redirects back to `/callback`, where the code is exchanged for a token.

use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by Spotify when the user declines
    pub error: Option<String>,
}

/// GET /login
pub async fn login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let oauth_state = Uuid::new_v4().to_string();
    let url = state.oauth.authorize_url(&oauth_state)?;

    state
        .oauth_states
        .write()
        .await
        .insert(oauth_state, Utc::now());
    Ok(Redirect::to(&url))
}

/// GET /callback?code=&state=
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Spotify authorization declined");
        return Err(ApiError::BadRequest(format!(
            "Spotify authorization failed: {}",
            error
        )));
    }

    let returned_state = params
        .state
        .ok_or_else(|| ApiError::BadRequest("Missing state parameter".to_string()))?;
    if !state
        .oauth_states
        .write()
        .await
        .take(&returned_state, Utc::now())
    {
        return Err(ApiError::BadRequest("Unknown or expired state".to_string()));
    }

    let code = params
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing code parameter".to_string()))?;

    state.oauth.exchange_code(&state.user_id, &code).await?;
    Ok(Redirect::to("/"))
}

/// GET /logout
pub async fn logout(State(state): State<AppState>) -> ApiResult<Redirect> {
    state.oauth.logout(&state.user_id).await?;
    tracing::info!(user_id = %state.user_id, "Spotify token removed");
    Ok(Redirect::to("/"))
}

/// Build login routes
pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", get(logout))
}
