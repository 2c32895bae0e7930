//! Admin HTTP surface driven end to end through the router.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio_test::assert_ok;
use tower::ServiceExt;

use hwregistry::api;
use hwregistry::app_state::AppState;
use hwregistry::domain::{
    EventBus, InstanceRegistry, ServiceHandle, ServiceIdentity, SharedService, StrongRefCount,
};
use hwregistry::service::ServiceManager;

#[derive(Debug)]
struct Node {
    count: AtomicUsize,
}

impl ServiceHandle for Node {
    fn is_remote(&self) -> bool {
        true
    }

    fn strong_ref_count(&self) -> StrongRefCount {
        StrongRefCount::Known(self.count.load(Ordering::SeqCst))
    }
}

fn identity(instance: &str) -> ServiceIdentity {
    let Ok(id) = ServiceIdentity::new("android.hardware.foo@1.0::IFoo", instance) else {
        panic!("valid identity");
    };
    id
}

fn app() -> (Router, Arc<ServiceManager>) {
    let event_bus = EventBus::new(64);
    let manager = Arc::new(ServiceManager::new(
        Arc::new(InstanceRegistry::new()),
        event_bus.clone(),
    ));
    let state = AppState {
        service_manager: Arc::clone(&manager),
        event_bus,
    };
    (api::build_router().with_state(state), manager)
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = assert_ok!(Request::builder().uri(uri).body(Body::empty()));
    let response = assert_ok!(router.oneshot(request).await);
    let status = response.status();
    let bytes = assert_ok!(axum::body::to_bytes(response.into_body(), usize::MAX).await);
    let value = assert_ok!(serde_json::from_slice(&bytes));
    (status, value)
}

#[tokio::test]
async fn health_reports_instance_count() {
    let (router, manager) = app();
    manager.register_passthrough_client(&identity("default"), 1).await;

    let (status, body) = get_json(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status"), Some(&serde_json::json!("healthy")));
    assert_eq!(body.get("instances"), Some(&serde_json::json!(1)));
}

#[tokio::test]
async fn list_shows_registered_and_placeholder_instances() {
    let (router, manager) = app();
    let node: SharedService = Arc::new(Node {
        count: AtomicUsize::new(2),
    });
    manager.register_service(identity("b"), node, 42).await;
    manager.register_passthrough_client(&identity("a"), 7).await;
    manager.poll_all_client_presence().await;

    let (status, body) = get_json(router, "/api/v1/instances").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("total"), Some(&serde_json::json!(2)));
    assert_eq!(
        body.pointer("/data/0/passthrough_clients"),
        Some(&serde_json::json!([7]))
    );
    assert_eq!(body.pointer("/data/0/registered"), Some(&serde_json::json!(false)));
    assert_eq!(body.pointer("/data/1/owning_pid"), Some(&serde_json::json!(42)));
    assert_eq!(body.pointer("/data/1/has_clients"), Some(&serde_json::json!(true)));
}

#[tokio::test]
async fn describe_unknown_instance_is_404() {
    let (router, _) = app();
    let (status, body) = get_json(
        router,
        "/api/v1/instances/android.hardware.foo@1.0::IFoo/missing",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.pointer("/error/code"), Some(&serde_json::json!(2001)));
}

#[tokio::test]
async fn describe_known_instance() {
    let (router, manager) = app();
    let node: SharedService = Arc::new(Node {
        count: AtomicUsize::new(1),
    });
    manager.register_service(identity("default"), node, 9).await;

    let (status, body) = get_json(
        router,
        "/api/v1/instances/android.hardware.foo@1.0::IFoo/default",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("instance"), Some(&serde_json::json!("default")));
    assert_eq!(body.get("remote"), Some(&serde_json::json!(true)));
    assert_eq!(body.get("has_clients"), Some(&serde_json::json!(false)));
}
