/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskapp_api::{app::{build_router, AppState}, config::Config};
/// use taskapp_shared::{db::pool::create_pool, store::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
///
/// let app = build_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use taskapp_shared::{
    auth::{jwt::TokenIssuer, middleware::authenticate},
    services::Services,
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, error::ApiError, routes};

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; everything inside
/// is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub services: Services,
    pub issuer: TokenIssuer,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let issuer = config.token_issuer();

        Self {
            services: Services::new(store.clone(), issuer.clone()),
            store,
            issuer,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /health                                     public
/// /api/v1/auth/{signup,signin}                public
/// /api/v1/account[/:email]                    bearer token
/// /api/v1/task/...                            bearer token
/// /api/v1/comment/...                         bearer token
/// ```
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/signin", post(routes::auth::signin));

    let account_routes = Router::new()
        .route("/", get(routes::account::list_accounts))
        .route("/:email", get(routes::account::get_account));

    let task_routes = Router::new()
        .route(
            "/",
            post(routes::task::create_task)
                .get(routes::task::list_tasks)
                .put(routes::task::update_task),
        )
        .route(
            "/:id",
            get(routes::task::get_task).delete(routes::task::delete_task),
        )
        .route("/:id/assign/:account_id", post(routes::task::assign_task))
        .route("/:id/unsign", post(routes::task::unassign_task))
        .route("/:id/change_status", post(routes::task::change_status))
        .route("/:id/change_priority", post(routes::task::change_priority))
        .route("/author/:account_id", get(routes::task::tasks_by_author))
        .route("/assignee/:account_id", get(routes::task::tasks_by_assignee));

    let comment_routes = Router::new()
        .route("/add/:task_id", post(routes::comment::add_comment))
        .route("/task/:task_id", get(routes::comment::comments_by_task))
        .route("/author/:account_id", get(routes::comment::comments_by_author))
        .route("/:id", delete(routes::comment::delete_comment));

    let protected = Router::new()
        .nest("/account", account_routes)
        .nest("/task", task_routes)
        .nest("/comment", comment_routes)
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(protected);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Validates the bearer token and stores the [`Caller`] in request extensions
///
/// [`Caller`]: taskapp_shared::auth::middleware::Caller
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = authenticate(req.headers(), &state.issuer)?;

    tracing::debug!(caller = %caller.email, "Authenticated request");
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
