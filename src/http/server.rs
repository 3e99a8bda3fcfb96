//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, limits, metrics)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{delete, get, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::ItemStore;
use crate::config::EmporiumConfig;
use crate::http::handlers::{
    add_item, delete_item, find_items, get_item, health, list_items, update_item,
};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::security::{headers, limits};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ItemStore>,
}

/// HTTP server for the item catalog.
pub struct HttpServer {
    router: Router,
    store: Arc<ItemStore>,
}

impl HttpServer {
    /// Create a server whose catalog is built from the configuration.
    pub fn new(config: EmporiumConfig) -> Self {
        let store = if config.catalog.seed_demo_items {
            ItemStore::with_demo_items()
        } else {
            ItemStore::new()
        };
        Self::with_store(config, Arc::new(store))
    }

    /// Create a server over an existing catalog.
    pub fn with_store(config: EmporiumConfig, store: Arc<ItemStore>) -> Self {
        let state = AppState {
            store: store.clone(),
        };
        let router = build_router(&config, state);
        Self { router, store }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            items = self.store.len(),
            "HTTP server starting"
        );
        metrics::record_catalog_size(self.store.len());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A handle to the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> Arc<ItemStore> {
        self.store.clone()
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &EmporiumConfig, state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(list_items).post(add_item))
        .route("/items", get(find_items))
        .route("/items/", get(find_items))
        .route("/items/{item_id}", get(get_item))
        .route("/update/{item_id}", put(update_item))
        .route("/delete/{item_id}", delete(delete_item))
        .route("/health", get(health))
        .with_state(state)
        .route_layer(middleware::from_fn(metrics::track_metrics))
        .layer(limits::body_limit_layer(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

    if config.security.enable_headers {
        router = router
            .layer(headers::nosniff_layer())
            .layer(headers::no_store_layer());
    }

    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id(request),
            )
        }))
        .layer(set_request_id_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        HttpServer::new(EmporiumConfig::default()).router()
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_list_items() {
        let (status, body) = send(app(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"]["0"]["name"], "Hammer");
        assert_eq!(body["items"]["2"]["category"], "consumables");
        assert_eq!(body["items"].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_item() {
        let (status, body) = send(app(), Method::GET, "/items/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"name": "Pliers", "price": 5.99, "count": 20, "id": 1, "category": "tools"})
        );
    }

    #[tokio::test]
    async fn test_get_missing_item_is_404() {
        let (status, body) = send(app(), Method::GET, "/items/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Item with 42 does not exist."}));
    }

    #[tokio::test]
    async fn test_get_non_integer_id_is_422() {
        let (status, _) = send(app(), Method::GET, "/items/hammer", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_find_items() {
        let (status, body) = send(app(), Method::GET, "/items/?count=20", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["query"],
            json!({"name": null, "price": null, "count": 20, "category": null})
        );
        let names: Vec<_> = body["selection"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Hammer", "Pliers"]);

        let (status, body) = send(app(), Method::GET, "/items?category=consumables", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"][0]["name"], "Nails");
    }

    #[tokio::test]
    async fn test_find_rejects_bad_query() {
        let (status, _) = send(app(), Method::GET, "/items/?category=ingredient", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(app(), Method::GET, "/items/?count=Hello", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_add_item() {
        let app = app();
        let screwdriver =
            json!({"name": "Screwdriver", "price": 3.99, "count": 10, "id": 4, "category": "tools"});

        let (status, body) = send(app.clone(), Method::POST, "/", Some(screwdriver.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "added": screwdriver }));

        let (status, body) = send(app, Method::GET, "/items/4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Screwdriver");
    }

    #[tokio::test]
    async fn test_add_duplicate_is_400() {
        let app = app();
        let saw = json!({"name": "Saw", "price": 12.0, "count": 1, "id": 0, "category": "tools"});

        let (status, body) = send(app.clone(), Method::POST, "/", Some(saw)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "Item with 0 already exists."}));

        let (_, body) = send(app, Method::GET, "/items/0", None).await;
        assert_eq!(body["name"], "Hammer");
    }

    #[tokio::test]
    async fn test_add_invalid_body_is_422() {
        let bad = json!({"name": "Screwdriver", "price": 3.99, "count": "Hello", "id": 4, "category": "tools"});
        let (status, body) = send(app(), Method::POST, "/", Some(bad)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_array());
    }

    #[tokio::test]
    async fn test_update_item() {
        let app = app();
        let (status, body) = send(app.clone(), Method::PUT, "/update/0?count=9001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"]["count"], 9001);
        assert_eq!(body["updated"]["name"], "Hammer");

        let (status, body) =
            send(app.clone(), Method::PUT, "/update/1?name=Tongs&price=4.5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"]["name"], "Tongs");
        assert_eq!(body["updated"]["price"], 4.5);

        let (_, body) = send(app, Method::GET, "/items/0", None).await;
        assert_eq!(body["count"], 9001);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let (status, body) = send(app(), Method::PUT, "/update/0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "No parameters provided for update."}));

        let (status, _) = send(app(), Method::PUT, "/update/42?count=1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for uri in [
            "/update/0?count=-1",
            "/update/0?price=-1",
            "/update/0?price=inf",
            "/update/0?name=SuperDuperHammer",
            "/update/-1?count=1",
        ] {
            let (status, _) = send(app(), Method::PUT, uri, None).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_update_reports_every_violation() {
        let (status, body) =
            send(app(), Method::PUT, "/update/0?price=0&count=-5", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_item() {
        let app = app();
        let (status, body) = send(app.clone(), Method::DELETE, "/delete/0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["delete"]["name"], "Hammer");

        let (status, _) = send(app.clone(), Method::DELETE, "/delete/0", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(app, Method::GET, "/", None).await;
        assert_eq!(body["items"].as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unseeded_catalog_is_empty() {
        let mut config = EmporiumConfig::default();
        config.catalog.seed_demo_items = false;
        let server = HttpServer::new(config);
        assert!(server.store().is_empty());

        let (status, body) = send(server.router(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"items": {}}));
    }

    #[tokio::test]
    async fn test_response_headers() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers["x-content-type-options"], "nosniff");

        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "client-chosen")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "client-chosen");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut config = EmporiumConfig::default();
        config.security.max_body_size = 32;
        let app = HttpServer::new(config).router();

        let big = json!({"name": "A very long name indeed", "price": 1.0, "count": 1, "id": 9, "category": "tools"});
        let (status, _) = send(app, Method::POST, "/", Some(big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
