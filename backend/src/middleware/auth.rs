use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{
    models::{activity_log::ActorRole, user::User},
    repositories::user as user_repo,
    state::AppState,
    utils::jwt::{verify_access_token, Claims},
};

/// Any authenticated account.
pub async fn auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, request, next, None).await
}

// Auth + require admin role for back-office routes
pub async fn auth_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, request, next, Some(ActorRole::Admin)).await
}

// Auth + require affiliate role for the affiliate portal routes
pub async fn auth_affiliate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, request, next, Some(ActorRole::Affiliate)).await
}

async fn authorize(
    state: &AppState,
    mut request: Request,
    next: Next,
    required_role: Option<ActorRole>,
) -> Result<Response, StatusCode> {
    let (claims, user) = authenticate_request(request.headers(), state).await?;
    if let Some(role) = required_role {
        if user.role != role {
            tracing::warn!(
                user_id = %user.id,
                role = %user.role,
                required = %role,
                "Rejected request for insufficient role"
            );
            return Err(StatusCode::FORBIDDEN);
        }
    }

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        let token = rest.trim();
        (!token.is_empty()).then_some(token)
    } else {
        None
    }
}

async fn authenticate_request(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<(Claims, User), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = verify_access_token(token, &state.config.jwt_secret)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // The role comes from the database, not the token, so a demoted admin
    // loses access on the next request.
    let user = user_repo::fetch_user_by_id(&state.pool, &claims.sub)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to load authenticated user");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    Ok((claims, user))
}
