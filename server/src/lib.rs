use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use gamerec_core::analytics::WELCOME_MESSAGE;
use gamerec_core::loader::DataPaths;
use gamerec_core::{Error, SelfExclusion, SharedSnapshot, Snapshot, DEFAULT_K, NOT_FOUND_MESSAGE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub id_producto: String,
}

#[derive(Deserialize)]
pub struct DeveloperParams {
    pub desarrollador: String,
}

#[derive(Deserialize)]
pub struct UserParams {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct GenreParams {
    pub genero: String,
}

#[derive(Deserialize)]
pub struct YearParams {
    #[serde(rename = "año")]
    pub year: i64,
}

#[derive(Deserialize)]
pub struct ReviewParams {
    pub desarrolladora: String,
}

type ApiError = (StatusCode, Json<Value>);

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub exclusion: SelfExclusion,
    pub snapshot: Arc<SharedSnapshot<Snapshot>>,
    pub admin_token: Option<String>,
}

impl AppState {
    /// Build the first snapshot from `data_dir`. Fails if the catalog cannot be built.
    pub fn load(data_dir: &str, exclusion: SelfExclusion, admin_token: Option<String>) -> Result<Self> {
        let snapshot = Snapshot::load(&DataPaths::new(data_dir), exclusion)?;
        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            exclusion,
            snapshot: Arc::new(SharedSnapshot::new(snapshot)),
            admin_token,
        })
    }
}

/// Load the data directory and wire the router, taking the admin token from `ADMIN_TOKEN`.
pub fn build_app(data_dir: String, exclusion: SelfExclusion) -> Result<Router> {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState::load(&data_dir, exclusion, admin_token)?;
    Ok(router(app_state))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/developer", get(developer_handler))
        .route("/userdata", get(userdata_handler))
        .route("/UserForGenre", get(user_for_genre_handler))
        .route("/best_developer_year", get(best_developer_year_handler))
        .route("/developer_reviews_analysis", get(developer_reviews_handler))
        .route("/recomendacion_juego", get(recommend_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<String>, ApiError> {
    let snapshot = state.snapshot.load();
    match snapshot.recommender.recommend(&params.id_producto, DEFAULT_K) {
        Ok(rec) => Ok(Json(rec.message())),
        Err(Error::NotFound(_)) => Ok(Json(NOT_FOUND_MESSAGE.to_string())),
        Err(e) => Err(internal(e)),
    }
}

pub async fn developer_handler(State(state): State<AppState>, Query(p): Query<DeveloperParams>) -> Result<Json<Value>, ApiError> {
    respond(state.snapshot.load().analytics.developer(&p.desarrollador))
}

pub async fn userdata_handler(State(state): State<AppState>, Query(p): Query<UserParams>) -> Result<Json<Value>, ApiError> {
    respond(state.snapshot.load().analytics.userdata(&p.user_id))
}

pub async fn user_for_genre_handler(State(state): State<AppState>, Query(p): Query<GenreParams>) -> Result<Json<Value>, ApiError> {
    respond(state.snapshot.load().analytics.user_for_genre(&p.genero))
}

pub async fn best_developer_year_handler(State(state): State<AppState>, Query(p): Query<YearParams>) -> Result<Json<Value>, ApiError> {
    respond(state.snapshot.load().analytics.best_developer_year(p.year))
}

pub async fn developer_reviews_handler(State(state): State<AppState>, Query(p): Query<ReviewParams>) -> Result<Json<Value>, ApiError> {
    respond(state.snapshot.load().analytics.developer_reviews_analysis(&p.desarrolladora))
}

fn respond(result: gamerec_core::Result<Value>) -> Result<Json<Value>, ApiError> {
    match result {
        Ok(v) => Ok(Json(v)),
        Err(e @ Error::DatasetUnavailable(_)) => Err((StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": e.to_string() })))),
        Err(e) => Err(internal(e)),
    }
}

fn internal(e: Error) -> ApiError {
    tracing::error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
}

// --- Admin endpoints ---
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let paths = DataPaths::new(&state.data_dir);
    let exclusion = state.exclusion;
    let loaded = tokio::task::spawn_blocking(move || Snapshot::load(&paths, exclusion))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let snapshot = loaded.map_err(|e| {
        tracing::error!(error = %e, "reload failed, keeping current snapshot");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let items = snapshot.recommender.catalog().len();
    let vocabulary = snapshot.recommender.model().vocabulary().len();
    state.snapshot.publish(snapshot);
    tracing::info!(items, vocabulary, "snapshot reloaded");
    Ok(Json(json!({ "items": items, "vocabulary": vocabulary })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
