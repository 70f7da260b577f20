//! GitHub OAuth handlers

use super::types::{AuthorizeResponse, OAuthCodeParams, TokenResponse};
use crate::oauth::{OAuthError, OAuthErrorBody};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, FromRequest, Query, Request, State},
    http::header::CONTENT_TYPE,
    response::Json,
    Form,
};
use tracing::{info, warn};

const MISSING_CODE: &str = "The 'code' parameter is required";
const MISSING_CODE_IN_BODY: &str = "The 'code' parameter is required in request body";

fn non_empty(code: Option<String>) -> Option<String> {
    code.filter(|c| !c.trim().is_empty())
}

/// Read `code` from a JSON or form-urlencoded body. Unreadable bodies count as
/// a missing code.
async fn code_from_body(request: Request) -> Option<String> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let params = if is_form {
        Form::<OAuthCodeParams>::from_request(request, &())
            .await
            .map(|Form(params)| params)
            .map_err(|e| warn!(error = %e, "Unreadable form body"))
            .ok()
    } else {
        Json::<OAuthCodeParams>::from_request(request, &())
            .await
            .map(|Json(params)| params)
            .map_err(|e| warn!(error = %e, "Unreadable JSON body"))
            .ok()
    };

    params.and_then(|p| non_empty(p.code))
}

/// Exchange an authorization code passed in the query string
#[utoipa::path(
    get,
    path = "/oauth/github",
    tag = "OAuth",
    summary = "Exchange authorization code",
    params(OAuthCodeParams),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing code or GitHub rejected it", body = OAuthErrorBody),
        (status = 500, description = "Unexpected GitHub response or GitHub unreachable", body = OAuthErrorBody)
    )
)]
pub async fn github_oauth_get(
    State(state): State<AppState>,
    params: Result<Query<OAuthCodeParams>, QueryRejection>,
) -> Result<Json<TokenResponse>, OAuthError> {
    let params = params.map_err(|rejection| {
        warn!(error = %rejection, "Unreadable query string");
        OAuthError::missing_code(MISSING_CODE)
    })?;
    let code = non_empty(params.0.code);
    info!(
        has_code = code.is_some(),
        code_length = code.as_deref().map_or(0, str::len),
        "GET /oauth/github"
    );

    let code = code.ok_or_else(|| {
        warn!("Missing authorization code in query");
        OAuthError::missing_code(MISSING_CODE)
    })?;

    let token = state.oauth.exchange_code(&code).await?;
    Ok(Json(token.into()))
}

/// Exchange an authorization code passed in a JSON or form body
#[utoipa::path(
    post,
    path = "/oauth/github",
    tag = "OAuth",
    summary = "Exchange authorization code",
    request_body(
        content = OAuthCodeParams,
        content_type = "application/json",
        description = "Also accepted as application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing code or GitHub rejected it", body = OAuthErrorBody),
        (status = 500, description = "Unexpected GitHub response or GitHub unreachable", body = OAuthErrorBody)
    )
)]
pub async fn github_oauth_post(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<TokenResponse>, OAuthError> {
    let code = code_from_body(request).await;
    info!(
        has_code = code.is_some(),
        code_length = code.as_deref().map_or(0, str::len),
        "POST /oauth/github"
    );

    let code = code.ok_or_else(|| {
        warn!("Missing authorization code in request body");
        OAuthError::missing_code(MISSING_CODE_IN_BODY)
    })?;

    let token = state.oauth.exchange_code(&code).await?;
    Ok(Json(token.into()))
}

/// Build the GitHub consent URL with a fresh `state` value
#[utoipa::path(
    get,
    path = "/oauth/github/authorize",
    tag = "OAuth",
    summary = "GitHub authorize URL",
    description = "The server does not keep the state; the client must compare it on callback",
    responses(
        (status = 200, description = "Authorize URL", body = AuthorizeResponse),
        (status = 500, description = "OAuth not configured", body = OAuthErrorBody)
    )
)]
pub async fn github_authorize(
    State(state): State<AppState>,
) -> Result<Json<AuthorizeResponse>, OAuthError> {
    let csrf_state = uuid::Uuid::new_v4().simple().to_string();
    let url = state.oauth.authorize_url(&csrf_state)?;

    Ok(Json(AuthorizeResponse {
        url,
        state: csrf_state,
    }))
}
