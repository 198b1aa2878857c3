/// Authentication middleware
///
/// [`identity_layer`] resolves the `Authorization` header and stores the
/// resulting [`Identity`] in the request extensions. [`admin_layer`] runs
/// after it on the admin surface and replaces that with an unscoped
/// [`AuthContext`].
///
/// Handlers read them back with `Extension<Identity>` or
/// `Extension<AuthContext>`.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};
use taskgate_shared::auth::{require_admin, AuthContext, Identity};

pub async fn identity_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let identity = state.identity.resolve(credential.as_deref()).await?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

pub async fn admin_layer(
    Extension(identity): Extension<Identity>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: AuthContext = require_admin(identity)?;
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
