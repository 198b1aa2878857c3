/// Application state and router
///
/// # Routes
///
/// ```text
/// GET    /health
/// POST   /api/v1/users                                   public
/// POST   /api/v1/login                                   public
/// GET    /api/v1/companies/:company_id/tasks             identity + membership
/// POST   /api/v1/companies/:company_id/tasks             identity + membership
/// GET    /api/v1/companies/:company_id/tasks/:task_id    identity + membership
/// PUT    /api/v1/companies/:company_id/tasks/:task_id    identity + membership
/// DELETE /api/v1/companies/:company_id/tasks/:task_id    identity + membership
/// GET    /api/v1/admin/tasks                             identity + admin
/// POST   /api/v1/admin/tasks                             identity + admin
/// GET    /api/v1/admin/tasks/:task_id                    identity + admin
/// PUT    /api/v1/admin/tasks/:task_id                    identity + admin
/// DELETE /api/v1/admin/tasks/:task_id                    identity + admin
/// ```
///
/// The identity layer runs on every non-public route. The membership gate
/// needs the path company, so company handlers invoke it themselves.

use crate::config::Config;
use crate::middleware::auth::{admin_layer, identity_layer};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskgate_shared::auth::{IdentityResolver, MembershipGate};
use taskgate_shared::services::{AuthService, TaskService, UserService};
use taskgate_shared::store::{PgStore, SharedStore};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cheap to clone; every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Present only when running on PostgreSQL
    pub db: Option<PgPool>,

    pub identity: IdentityResolver,

    pub gate: MembershipGate,

    pub tasks: TaskService,

    pub users: UserService,

    pub auth: AuthService,
}

impl AppState {
    /// Wires the services over an arbitrary store
    pub fn new(store: SharedStore, config: Config) -> Self {
        let signer = config.token_signer();

        Self {
            identity: IdentityResolver::new(signer.clone(), store.clone()),
            gate: MembershipGate::new(store.clone()),
            tasks: TaskService::new(store.clone(), config.pagination()),
            users: UserService::new(store.clone()),
            auth: AuthService::new(store, signer),
            db: None,
            config: Arc::new(config),
        }
    }

    /// Wires the services over PostgreSQL
    pub fn with_database(pool: PgPool, config: Config) -> Self {
        let store: SharedStore = Arc::new(PgStore::new(pool.clone()));

        Self {
            db: Some(pool),
            ..Self::new(store, config)
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/users", post(routes::users::register))
        .route("/login", post(routes::auth::login));

    let company_routes = Router::new()
        .route(
            "/companies/:company_id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/companies/:company_id/tasks/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(from_fn_with_state(state.clone(), identity_layer));

    // Layers run bottom-up: identity first, then the admin check
    let admin_routes = Router::new()
        .route(
            "/admin/tasks",
            get(routes::admin_tasks::list_tasks).post(routes::admin_tasks::create_task),
        )
        .route(
            "/admin/tasks/:task_id",
            get(routes::admin_tasks::get_task)
                .put(routes::admin_tasks::update_task)
                .delete(routes::admin_tasks::delete_task),
        )
        .layer(from_fn(admin_layer))
        .layer(from_fn_with_state(state.clone(), identity_layer));

    let v1_routes = Router::new()
        .merge(public_routes)
        .merge(company_routes)
        .merge(admin_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", v1_routes)
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            ),
        )
        .with_state(state)
}
