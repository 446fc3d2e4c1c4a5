use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{self, HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult};
use platform_db::DbPool;
use products_hr::{
    DirectoryError, EmployeeOption, EmployeeUpdate, NewProduct, UpsertOutcome, create_product,
    list_business_units, list_domains, list_employees, upsert_employee,
};
use sea_orm::{ConnectionTrait, Statement};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "directory server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

/// Credentials are only allowed together with an explicit origin list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let layer = CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST]);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_credentials(true)
            .allow_origin(AllowOrigin::list(allowed))
    }
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/business_units", get(business_units_handler))
        .route("/domains", get(domains_handler))
        .route("/employees", get(employees_handler))
        .route("/employees/", get(employees_handler))
        .route("/new_employee", post(new_employee_handler))
        .route("/new_product", post(new_product_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

fn directory_error(err: DirectoryError) -> ApiError {
    match err {
        DirectoryError::InvalidInput { .. } => ApiError::invalid(err.to_string()),
        DirectoryError::Store(source) => ApiError::internal(source),
    }
}

async fn business_units_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = list_business_units(&state.db)
        .await
        .map_err(directory_error)?;
    Ok(Json(names))
}

async fn domains_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = list_domains(&state.db).await.map_err(directory_error)?;
    Ok(Json(names))
}

#[derive(Debug, Deserialize)]
struct EmployeesQuery {
    role: Option<String>,
}

async fn employees_handler(
    State(state): State<AppState>,
    Query(query): Query<EmployeesQuery>,
) -> ApiResult<Json<Vec<EmployeeOption>>> {
    let employees = list_employees(&state.db, query.role.as_deref())
        .await
        .map_err(directory_error)?;
    Ok(Json(employees))
}

/// Always answers 200 with the submitted body; write problems are logged.
async fn new_employee_handler(
    State(state): State<AppState>,
    Json(update): Json<EmployeeUpdate>,
) -> Json<EmployeeUpdate> {
    match upsert_employee(&state.db, &update).await {
        UpsertOutcome::Applied => info!(employee = %update.uuid, "employee updated"),
        UpsertOutcome::NotFound => debug!(employee = %update.uuid, "no employee matched update"),
        UpsertOutcome::WriteFailed(reason) => warn!(
            employee = %update.uuid,
            "employee update failed: {}",
            reason.replace('\n', " ")
        ),
    }
    Json(update)
}

async fn new_product_handler(
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> ApiResult<Json<NewProduct>> {
    let product = create_product(&state.db, &new)
        .await
        .map_err(directory_error)?;
    info!(product = %product.id, manager = %product.manager_id, "product created");
    Ok(Json(new))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.db.get_database_backend();
    let db_ok = state
        .db
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
