//! Integration tests for the HTTP API.
//!
//! Exercises room creation, discovery, and round start over the router
//! without binding a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method
use uuid::Uuid;

use bj_server::api::{AppState, create_router};
use blackjack::game::entities::PlayerId;
use blackjack::{GameSettings, TableRegistry};

fn test_app() -> (Router, Arc<TableRegistry>) {
    let registry = Arc::new(TableRegistry::new(GameSettings::default()));
    let app = create_router(AppState::new(registry.clone()));
    (app, registry)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["rooms"], 0);
}

#[tokio::test]
async fn test_create_room_and_list() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/rooms")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let room_id: Uuid = json["room_id"].as_str().unwrap().parse().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/rooms")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rooms = json.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["table_id"], room_id.to_string());
    assert_eq!(rooms[0]["player_count"], 0);
    assert_eq!(rooms[0]["phase"], "lobby");
}

#[tokio::test]
async fn test_start_unknown_room_is_not_found() {
    let (app, _) = test_app();

    let uri = format!("/api/v1/rooms/{}/start", Uuid::new_v4());
    let response = app
        .oneshot(post_json(&uri, serde_json::json!({"player_id": "p1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_requires_a_seat() {
    let (app, registry) = test_app();
    let room_id = registry.create_table().await;

    let uri = format!("/api/v1/rooms/{room_id}/start");
    let response = app
        .oneshot(post_json(&uri, serde_json::json!({"player_id": "ghost"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("player"));
}

#[tokio::test]
async fn test_seated_player_starts_a_round() {
    let (app, registry) = test_app();
    let room_id = registry.create_table().await;
    registry
        .join_table(room_id, PlayerId::new("alice"), "alice".to_string().into())
        .await
        .unwrap();

    let uri = format!("/api/v1/rooms/{room_id}/start");
    let response = app
        .clone()
        .oneshot(post_json(&uri, serde_json::json!({"player_id": "alice"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A lone player skips betting and is dealt straight in.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/rooms")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json[0]["phase"], "player_turns");

    // Starting again mid-round is rejected.
    let response = app
        .oneshot(post_json(&uri, serde_json::json!({"player_id": "alice"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
