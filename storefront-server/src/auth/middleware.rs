//! 认证中间件
//!
//! 为管理接口提供 JWT 认证

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Storefront routes reachable without a token
///
/// Reads of the menu, categories and items, cart pricing, checkout and login.
pub fn is_public_route(method: &Method, path: &str) -> bool {
    let under = |prefix: &str| path == prefix || path.starts_with(&format!("{prefix}/"));
    match *method {
        Method::GET => under("/api/menu") || under("/api/categories") || under("/api/items"),
        Method::POST => {
            path == "/api/auth/login" || path == "/api/cart/price" || path == "/api/checkout"
        }
        _ => false,
    }
}

/// 认证中间件
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health`)
/// - [`is_public_route`]; 携带有效令牌时仍会注入 [`CurrentUser`]
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_owned();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    if is_public_route(req.method(), &path) {
        // Optional auth: admins see inactive records on public reads
        if let Some(token) = auth_header.as_deref().and_then(JwtService::extract_from_header)
            && let Ok(claims) = state.jwt_service.validate_token(token)
        {
            req.extensions_mut().insert(CurrentUser::from(claims));
        }
        return Ok(next.run(req).await);
    }

    let token = match auth_header.as_deref() {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
