use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use gamerec_core::SelfExclusion;
use gamerec_server::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

const TOKEN: &str = "s3cret";

fn write_catalog(dir: &Path, rows: &[(&str, &str)]) {
    let mut csv = String::from("id,title\n");
    for (id, title) in rows {
        csv.push_str(&format!("{id},{title}\n"));
    }
    fs::write(dir.join("df_recomendacion_juego.csv"), csv).unwrap();
}

fn build_data_dir(dir: &Path) {
    write_catalog(
        dir,
        &[
            ("1", "Counter Strike"),
            ("2", "Counter Strike 2"),
            ("3", "Half Life"),
            ("4", "Portal"),
            ("5", "Portal 2"),
            ("6", "Left 4 Dead"),
            ("7", "Left 4 Dead 2"),
        ],
    );
    fs::write(
        dir.join("df_developer.csv"),
        "developer,price,year\nValve,0,2007\nValve,\"9,99\",2007\nValve,19.99,2004\n",
    )
    .unwrap();
    fs::write(
        dir.join("best_developer_year.csv"),
        "year,developer,Recomendaciones\n2015,Valve,30\n2015,Ubisoft,10\n2015,Capcom,20\n2015,Sega,5\n",
    )
    .unwrap();
}

fn app(dir: &Path) -> Router {
    let state = AppState::load(&dir.to_string_lossy(), SelfExclusion::ById, Some(TOKEN.to_string())).unwrap();
    router(state)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn recommend_returns_numbered_message() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let (status, body) = get(app(dir.path()), "/recomendacion_juego?id_producto=1").await;
    assert_eq!(status, StatusCode::OK);
    let msg: String = serde_json::from_slice(&body).unwrap();
    assert!(msg.starts_with("Si te gusta 'Counter Strike' te recomendamos los siguientes juegos:\n1. id: 2\n   title: Counter Strike 2\n"));
    assert_eq!(msg.matches("title:").count(), 5);
    assert!(!msg.contains("id: 1\n"));
}

#[tokio::test]
async fn recommend_unknown_id_is_plain_message() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let (status, body) = get(app(dir.path()), "/recomendacion_juego?id_producto=999").await;
    assert_eq!(status, StatusCode::OK);
    let msg: String = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg, "No se encontró ningún juego con ese id");
}

#[tokio::test]
async fn analytics_endpoints_answer_from_loaded_datasets() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let app = app(dir.path());

    let (status, body) = get(app.clone(), "/developer?desarrollador=valve").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v[1], json!({ "Año": 2007, "Cantidad de Items": 2, "Contenido Free": "50.0%" }));

    let (status, body) = get(app.clone(), "/best_developer_year?a%C3%B1o=2015").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v, json!(["Puesto 1: Valve", "Puesto 2: Capcom", "Puesto 3: Ubisoft"]));

    let (status, _) = get(app, "/userdata?user_id=anyone").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn root_and_health() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let app = app(dir.path());
    let (status, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert!(v["message"].as_str().unwrap().contains("/docs"));
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn reload_swaps_snapshot() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let app = app(dir.path());

    write_catalog(dir.path(), &[("1", "Counter Strike"), ("8", "Strike Force")]);
    let req = Request::post("/admin/reload").header("X-ADMIN-TOKEN", TOKEN).body(Body::empty()).unwrap();
    let (status, body) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["items"], 2);

    let (_, body) = get(app, "/recomendacion_juego?id_producto=1").await;
    let msg: String = serde_json::from_slice(&body).unwrap();
    assert!(msg.contains("1. id: 8\n   title: Strike Force\n"));
}

#[tokio::test]
async fn reload_rejects_bad_token_and_keeps_snapshot_on_failure() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let app = app(dir.path());

    let req = Request::post("/admin/reload").header("X-ADMIN-TOKEN", "nope").body(Body::empty()).unwrap();
    let (status, _) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    write_catalog(dir.path(), &[]);
    let req = Request::post("/admin/reload").header("X-ADMIN-TOKEN", TOKEN).body(Body::empty()).unwrap();
    let (status, _) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = get(app, "/recomendacion_juego?id_producto=2").await;
    let msg: String = serde_json::from_slice(&body).unwrap();
    assert!(msg.starts_with("Si te gusta 'Counter Strike 2'"));
}

#[tokio::test]
async fn reload_without_configured_token_is_unauthorized() {
    let dir = tempdir().unwrap();
    build_data_dir(dir.path());
    let app = router(AppState::load(&dir.path().to_string_lossy(), SelfExclusion::ById, None).unwrap());
    let req = Request::post("/admin/reload").header("X-ADMIN-TOKEN", TOKEN).body(Body::empty()).unwrap();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(&body[..], b"ADMIN_TOKEN not set");
}

#[test]
fn empty_catalog_refuses_to_start() {
    let dir = tempdir().unwrap();
    write_catalog(dir.path(), &[]);
    assert!(gamerec_server::build_app(dir.path().to_string_lossy().to_string(), SelfExclusion::ById).is_err());
}
