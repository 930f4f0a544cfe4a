pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::account::handlers as account_handlers;
use crate::internal_transfer::api as transfer_handlers;
use crate::user_auth::{handlers as auth_handlers, middleware::bearer_auth_middleware};
use state::AppState;
use types::{ApiResult, ok};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub timestamp_ms: i64,
}

/// GET /api/v1/health
async fn health_check() -> ApiResult<HealthResponse> {
    ok(HealthResponse {
        timestamp_ms: Utc::now().timestamp_millis(),
    })
}

/// Build the full router over shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    let account_routes = Router::new()
        .route("/", get(account_handlers::get_own_account))
        .route("/{id}", get(account_handlers::get_account))
        .layer(from_fn_with_state(state.clone(), bearer_auth_middleware));

    let transfer_routes = Router::new()
        .route(
            "/",
            post(transfer_handlers::create_transfer).get(transfer_handlers::list_transfers),
        )
        .route("/{id}", get(transfer_handlers::get_transfer))
        .route("/{id}/repeat", post(transfer_handlers::repeat_transfer))
        .layer(from_fn_with_state(state.clone(), bearer_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/account", account_routes)
        .nest("/api/v1/transfers", transfer_routes)
        .with_state(state)
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(%addr, "Gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountRepository, NewAccount, Tier};
    use crate::config::AppConfig;
    use crate::internal_transfer::MemoryLedgerStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const CONFIG: &str = r#"
log_level: info
log_dir: ./logs
log_file: ledger.log
use_json: false
rotation: never
gateway:
  host: 127.0.0.1
  port: 0
token:
  secret: router-test
"#;

    fn app() -> (Router, MemoryLedgerStore) {
        let store = MemoryLedgerStore::new();
        let config = AppConfig::from_yaml(CONFIG).unwrap();
        let state = AppState::assemble(config, Arc::new(store.clone()), Arc::new(store.clone()));
        (build_router(Arc::new(state)), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    async fn register(app: &Router, email: &str) -> (u64, String) {
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/auth/register",
                None,
                json!({"email": email, "name": "User", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["account_id"].as_u64().unwrap(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let req = Request::get("/api/v1/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        let (app, _) = app();
        let req = Request::get("/api/v1/transfers").body(Body::empty()).unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], types::error_codes::MISSING_AUTH);

        let (status, _) = send(&app, get_with("/api/v1/account", "not.valid")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let (app, _) = app();
        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/auth/register",
                None,
                json!({"email": "not-an-email", "name": "User", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_hides_password_hash() {
        let (app, _) = app();
        let (id, token) = register(&app, "alice@example.com").await;

        let (status, body) = send(&app, get_with("/api/v1/account", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["role"], "regular");
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_regular_account_cannot_transfer_or_look_up_others() {
        let (app, _) = app();
        let (_, token) = register(&app, "alice@example.com").await;
        let (bob, _) = register(&app, "bob@example.com").await;

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&token),
                json!({"recipient_id": bob, "sum": "10"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, get_with(&format!("/api/v1/account/{}", bob), &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_trusted_transfer_flow() {
        let (app, store) = app();
        let (_, token_a) = register(&app, "alice@example.com").await;
        let (bob, token_b) = register(&app, "bob@example.com").await;

        // Registration only yields regular accounts; seed a trusted one
        let carol = store
            .create(NewAccount {
                role: Tier::Trusted,
                email: "carol@example.com".to_string(),
                name: "Carol".to_string(),
                password_hash: crate::user_auth::hash_password("secret1").unwrap(),
                balance: Decimal::from(500),
            })
            .await
            .unwrap();
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/auth/login",
                None,
                json!({"email": "carol@example.com", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token_c = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&token_c),
                json!({"recipient_id": bob, "sum": "200"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["is_credit"], false);
        let transfer_id = body["data"]["id"].as_u64().unwrap();

        // Recipient sees a credit; an outsider is refused
        let uri = format!("/api/v1/transfers/{}", transfer_id);
        let (status, body) = send(&app, get_with(&uri, &token_b)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_credit"], true);
        assert_eq!(body["data"]["counterparty_id"], carol.id);
        let (status, _) = send(&app, get_with(&uri, &token_a)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Overdraft is refused and leaves balances alone
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&token_c),
                json!({"recipient_id": bob, "sum": "1000"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], types::error_codes::INSUFFICIENT_BALANCE);
        assert_eq!(store.balance_of(carol.id).await, Some(Decimal::from(300)));

        let (status, _) = send(
            &app,
            post_json(&format!("{}/repeat", uri), Some(&token_c), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.balance_of(bob).await, Some(Decimal::from(900)));

        let (status, body) = send(&app, get_with("/api/v1/transfers?limit=1", &token_b)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["transfers"].as_array().unwrap().len(), 1);
    }
}
