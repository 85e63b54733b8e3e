use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        analytics::cache_stats,
        health::livez,
        workshops::{
            create_workshop, delete_workshop, get_workshop, search_workshops, update_workshop,
        },
    },
    state::AppState,
};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-roles"),
        ]);

    let api_routes = Router::new()
        .route("/workshops", get(search_workshops).post(create_workshop))
        .route(
            "/workshops/{id}",
            get(get_workshop)
                .put(update_workshop)
                .delete(delete_workshop),
        )
        .route("/analytics/cache", get(cache_stats))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use workshops_core::workshop::Workshop;

    use crate::storage::{seed_workshops, CacheSettings, InMemoryRepository};

    fn seeded_app() -> Router {
        let repo = InMemoryRepository::with_workshops(seed_workshops(Utc::now()));
        create_app(AppState::with_repository(
            Arc::new(repo),
            100,
            CacheSettings::default(),
        ))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn as_user(method: &str, uri: &str, roles: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", "alice")
            .header("x-user-roles", roles)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn new_workshop_body(title: &str) -> Body {
        let start = Utc::now() + chrono::Duration::days(10);
        let end = start + chrono::Duration::hours(2);
        Body::from(
            serde_json::json!({
                "title": title,
                "start_at": start,
                "end_at": end,
                "location": "Room 7",
            })
            .to_string(),
        )
    }

    #[tokio::test]
    async fn test_livez() {
        let response = seeded_app().oneshot(get("/livez")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_then_create_then_search() {
        let app = seeded_app();

        let response = app
            .clone()
            .oneshot(get("/api/workshops?q=React"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await.as_array().unwrap().len(), 3);

        let response = app
            .clone()
            .oneshot(as_user(
                "POST",
                "/api/workshops",
                "instructor",
                new_workshop_body("Advanced React"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Workshop = serde_json::from_value(json(response).await).unwrap();
        assert_eq!(created.title, "Advanced React");

        let response = app
            .clone()
            .oneshot(get("/api/workshops?q=react"))
            .await
            .unwrap();
        assert_eq!(json(response).await.as_array().unwrap().len(), 4);

        let response = app
            .oneshot(get(&format!("/api/workshops/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_filters() {
        let response = seeded_app()
            .oneshot(get("/api/workshops?q=react&mode=online"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let results = json(response).await;
        let results = results.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["is_online"], true);
    }

    #[tokio::test]
    async fn test_invalid_search_is_bad_request() {
        let app = seeded_app();

        let response = app
            .clone()
            .oneshot(get("/api/workshops?mode=hybrid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(get(
                "/api/workshops?from=2024-06-20T00:00:00Z&to=2024-06-10T00:00:00Z",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_workshop_is_not_found() {
        let response = seeded_app()
            .oneshot(get(&format!("/api/workshops/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_write_requires_identity_and_role() {
        let app = seeded_app();

        let anonymous = Request::builder()
            .method("POST")
            .uri("/api/workshops")
            .header("Content-Type", "application/json")
            .body(new_workshop_body("Sneaky"))
            .unwrap();
        let response = app.clone().oneshot(anonymous).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(as_user(
                "POST",
                "/api/workshops",
                "student",
                new_workshop_body("Sneaky"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.oneshot(get("/api/workshops?q=sneaky")).await.unwrap();
        assert!(json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_workshop_is_bad_request() {
        let start = Utc::now() + chrono::Duration::days(10);
        let body = serde_json::json!({
            "title": "Backwards",
            "start_at": start,
            "end_at": start - chrono::Duration::hours(1),
        });

        let response = seeded_app()
            .oneshot(as_user(
                "POST",
                "/api/workshops",
                "admin",
                Body::from(body.to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = seeded_app();

        let response = app
            .clone()
            .oneshot(as_user(
                "POST",
                "/api/workshops",
                "instructor",
                new_workshop_body("Draft"),
            ))
            .await
            .unwrap();
        let created: Workshop = serde_json::from_value(json(response).await).unwrap();
        let uri = format!("/api/workshops/{}", created.id);

        let response = app
            .clone()
            .oneshot(as_user("PUT", &uri, "instructor", new_workshop_body("Final")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["operation"], "updated");

        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(json(response).await["title"], "Final");

        let response = app
            .clone()
            .oneshot(as_user("DELETE", &uri, "instructor", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(as_user("DELETE", &uri, "admin", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cache_stats_admin_only_and_stamped_per_request() {
        let app = seeded_app();

        app.clone()
            .oneshot(get("/api/workshops?q=react"))
            .await
            .unwrap();
        app.clone()
            .oneshot(get("/api/workshops?q=react"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(as_user("GET", "/api/analytics/cache", "instructor", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request_id = "550e8400-e29b-41d4-a716-446655440000";
        let request = Request::builder()
            .uri("/api/analytics/cache")
            .header("x-user-id", "root")
            .header("x-user-roles", "admin")
            .header("x-request-id", request_id)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json(response).await;
        assert_eq!(report["request_id"], request_id);
        assert_eq!(report["hits"], 1);
        assert_eq!(report["misses"], 1);
        assert_eq!(report["enabled"], true);
    }
}
