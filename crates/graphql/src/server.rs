//! GraphQL HTTP server.

use std::future::Future;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tracing::{info, warn};

use agora_core::services::Paginator;

use crate::schema::build_schema;
use crate::types::AgoraSchema;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Serve GraphiQL on `GET /` and `GET /graphql`.
    pub enable_playground: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            enable_playground: true,
        }
    }
}

#[derive(Clone)]
struct AppState {
    schema: AgoraSchema,
    paginator: Arc<Paginator>,
}

/// Routes served by the API.
fn router(paginator: Arc<Paginator>, config: &ServerConfig) -> Router {
    let graphql = if config.enable_playground {
        get(graphql_playground).post(graphql_handler)
    } else {
        post(graphql_handler)
    };

    let mut app = Router::new()
        .route("/graphql", graphql)
        .route("/health", get(health_check));

    if config.enable_playground {
        app = app.route("/", get(graphql_playground));
    }

    app.with_state(AppState {
        schema: build_schema(paginator.clone()),
        paginator,
    })
}

/// Start the GraphQL server, stopping once `shutdown_signal` resolves.
///
/// In-flight requests are allowed to complete before returning.
pub async fn serve_with_shutdown<F>(
    paginator: Arc<Paginator>,
    config: ServerConfig,
    shutdown_signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(paginator, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, playground = config.enable_playground, "GraphQL server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

/// GraphQL query handler.
async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GraphQL Playground UI.
async fn graphql_playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Health check endpoint: 503 while the thread source is unreachable.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.paginator.source().ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
