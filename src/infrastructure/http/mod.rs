//! HTTP REST API routes

mod auth_routes;
mod roll_routes;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::application::ports::outbound::StoreError;
use crate::domain::entities::User;
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Auth routes
        .route("/api/auth/login", post(auth_routes::login))
        .route("/api/auth/logout", post(auth_routes::logout))
        .route("/api/auth/user", get(auth_routes::current_user))
        // Roll routes
        .route("/api/rolls", get(roll_routes::list_rolls))
        .route("/api/rolls", post(roll_routes::create_roll))
        .route("/api/rolls/{id}", get(roll_routes::get_roll))
}

/// Map a record store failure onto a response status
pub(crate) fn store_error(e: StoreError) -> (StatusCode, String) {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unauthorized => StatusCode::UNAUTHORIZED,
        StoreError::Api { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        StoreError::Transport(_) | StoreError::Decode(_) => StatusCode::BAD_GATEWAY,
    };
    (status, e.to_string())
}

/// Reject requests without a signed-in session
pub(crate) async fn require_user(state: &AppState) -> Result<User, (StatusCode, String)> {
    state
        .auth_service
        .current_user()
        .await
        .ok_or((StatusCode::UNAUTHORIZED, "Not signed in".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{FixedClock, FixedRandom};
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::discord::DiscordNotifier;
    use crate::infrastructure::memory_store::InMemoryRecordStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(draws: &[i32]) -> Router {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let store = Arc::new(InMemoryRecordStore::new());
        let state = AppState::from_parts(
            config,
            store.clone(),
            store,
            Arc::new(DiscordNotifier::new(None, None, "http://x/")),
            Arc::new(FixedRandom::new(draws)),
            Arc::new(FixedClock::new()),
        );
        create_routes().with_state(Arc::new(state))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
        (status, value)
    }

    async fn login(app: &Router) {
        let (status, user) = call(
            app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "wren@example.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["username"], "wren");
    }

    #[tokio::test]
    async fn test_rolls_require_sign_in() {
        let app = app(&[]);

        let (status, _) = call(&app, Method::GET, "/api/rolls", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, Method::GET, "/api/auth/user", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_validation() {
        let app = app(&[]);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "wren", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "wren@example.com", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_then_list_and_fetch() {
        let app = app(&[3, 5, 7]);
        login(&app).await;

        let (status, record) = call(
            &app,
            Method::POST,
            "/api/rolls",
            Some(json!({ "type": "d100", "target": 40, "roller": "Wren", "notes": "lockpick" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["die"], "d100");
        assert_eq!(record["output"]["parsedRoll"], 35);
        assert_eq!(record["output"]["isSuccess"], true);
        assert_eq!(record["notes"]["notes"], "lockpick");
        let id = record["id"].as_str().unwrap().to_string();

        let (status, page) = call(&app, Method::GET, "/api/rolls", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalItems"], 1);
        let row = &page["items"][0];
        assert_eq!(row["id"], id.as_str());
        assert_eq!(row["rollType"], "Skill");
        assert_eq!(row["roll"], 35);
        assert_eq!(row["target"], "40");
        assert_eq!(row["success"], "Success");
        assert_eq!(row["pending"], false);

        let (status, fetched) = call(&app, Method::GET, &format!("/api/rolls/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, record);

        let (status, _) = call(&app, Method::GET, "/api/rolls/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_roll_forms() {
        let app = app(&[]);
        login(&app).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/rolls",
            Some(json!({ "type": "d10", "numDice": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["numDice"].is_string());
        assert!(body["errors"]["roller"].is_string());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/rolls",
            Some(json!({ "type": "d100", "roller": "Wren" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["errors"]["target"],
            "A target number is required for a skill roll"
        );

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/rolls",
            Some(json!({ "type": "d10", "roller": "Wren", "modifier": i32::MAX })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["modifier"].is_string());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = app(&[]);
        login(&app).await;

        let (status, _) = call(&app, Method::POST, "/api/auth/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, "/api/rolls", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
