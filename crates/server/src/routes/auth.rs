use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use tracing::warn;

use service::auth::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    WithRejection(Json(input), _): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<AuthSession>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AuthUser>, JsonApiError> {
    Ok(Json(state.auth.current_user(&claims).await?))
}

/// Pull the session token from `Authorization: Bearer` or, failing that, the auth cookie.
fn extract_token(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(JsonApiError::unauthorized("invalid Authorization format (expect Bearer)")),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Verify the session token and expose its claims to handlers.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let token = match extract_token(&req) {
        Ok(Some(t)) => t,
        Ok(None) => {
            warn!(%path, "missing Authorization header and auth_token cookie");
            return Err(JsonApiError::unauthorized("authentication required"));
        }
        Err(e) => {
            warn!(%path, "malformed Authorization header");
            return Err(e);
        }
    };
    let claims = state.auth.verify_token(&token)?;
    if claims.user_id().is_none() {
        return Err(JsonApiError::unauthorized("invalid token subject"));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Reject authenticated callers without the admin role. Must run after `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, JsonApiError> {
    let caller = req.extensions().get::<Claims>().map(|c| (c.is_admin(), c.sub.clone()));
    match caller {
        Some((true, _)) => Ok(next.run(req).await),
        Some((false, user)) => {
            warn!(%user, path = %req.uri().path(), "admin route denied");
            Err(JsonApiError::forbidden("admin access required"))
        }
        None => Err(JsonApiError::unauthorized("authentication required")),
    }
}

/// Caller id from verified claims.
pub fn caller_id(claims: &Claims) -> Result<uuid::Uuid, JsonApiError> {
    claims.user_id().ok_or_else(|| JsonApiError::unauthorized("invalid token subject"))
}
