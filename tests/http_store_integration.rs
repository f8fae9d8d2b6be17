//! Integration tests for the store talking HTTP to an in-process posts service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use postsync::infra::app_config::ClientConfig;
use postsync::infra::http::{HttpPostsApi, PostsApi};
use postsync::{ApiError, OperationError, Post, PostDraft, Store};

#[derive(Clone, Default)]
struct Service {
    posts: Arc<Mutex<Vec<Post>>>,
    next_id: Arc<Mutex<u32>>,
}

async fn list_posts(State(service): State<Service>) -> Json<Vec<Post>> {
    Json(service.posts.lock().unwrap().clone())
}

async fn create_post(State(service): State<Service>, Json(draft): Json<PostDraft>) -> Response {
    if draft.title == "slow" {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
    if draft.title.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": { "title": "required" } })),
        )
            .into_response();
    }
    if draft.title == "explode" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let id = {
        let mut next = service.next_id.lock().unwrap();
        *next += 1;
        format!("srv-{next}")
    };
    let post = Post::from_draft(id, draft);
    service.posts.lock().unwrap().push(post.clone());
    (StatusCode::CREATED, Json(post)).into_response()
}

async fn update_post(
    State(service): State<Service>,
    Path(id): Path<String>,
    Json(post): Json<Post>,
) -> Response {
    if post.publish_date.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": { "publishDate": "must be set" } })),
        )
            .into_response();
    }
    let mut posts = service.posts.lock().unwrap();
    match posts.iter_mut().find(|p| p.id == id) {
        Some(existing) => {
            *existing = post.clone();
            Json(post).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "not found" }))).into_response(),
    }
}

async fn delete_post(State(service): State<Service>, Path(id): Path<String>) -> Response {
    service.posts.lock().unwrap().retain(|p| p.id != id);
    // The body deliberately names a different id.
    Json(json!({ "id": "unrelated" })).into_response()
}

async fn spawn_service(seed: Vec<Post>) -> (String, Service) {
    let service = Service {
        posts: Arc::new(Mutex::new(seed)),
        ..Default::default()
    };
    let app = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", put(update_post).delete(delete_post))
        .with_state(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), service)
}

fn store_for(base_url: &str) -> Store {
    let api = HttpPostsApi::new(&ClientConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5_000,
    })
    .unwrap();
    Store::new(Arc::new(api), Vec::new())
}

fn seeded(id: &str, title: &str) -> Post {
    Post {
        id: id.into(),
        title: title.into(),
        description: "seeded".into(),
        featured_image: "https://example.test/a.png".into(),
        publish_date: "2024-01-01T00:00".into(),
        published: true,
    }
}

fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.into(),
        description: "body".into(),
        featured_image: String::new(),
        publish_date: "2024-02-02T12:00".into(),
        published: false,
    }
}

#[tokio::test]
async fn test_list_refresh_over_http() {
    let (base, _service) = spawn_service(vec![seeded("1", "One"), seeded("2", "Two")]).await;
    let store = store_for(&base);

    store.list(&CancellationToken::new()).await.unwrap();

    let state = store.snapshot();
    let ids: Vec<_> = state.post_list.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert!(!state.busy);
}

#[tokio::test]
async fn test_create_update_delete_round_trip() {
    let (base, service) = spawn_service(vec![]).await;
    let store = store_for(&base);
    let cancel = CancellationToken::new();

    let created = store.create(draft("Hello"), &cancel).await.unwrap();
    assert_eq!(created.id, "srv-1");
    assert_eq!(store.snapshot().post_list, vec![created.clone()]);

    store.start_editing(created.id.clone());
    let mut form = store.snapshot().editing_post.unwrap();
    form.title = "Hello again".into();
    store
        .update(form.id.clone(), form, &cancel)
        .await
        .unwrap();
    let state = store.snapshot();
    assert_eq!(state.post_list[0].title, "Hello again");
    assert!(state.editing_post.is_none());

    store.delete(created.id.clone(), &cancel).await.unwrap();
    assert!(store.snapshot().post_list.is_empty());
    assert!(service.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_validation_failure_over_http() {
    let (base, _service) = spawn_service(vec![]).await;
    let store = store_for(&base);

    let err = store
        .create(draft(""), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.validation_errors().and_then(|e| e.get("title")),
        Some("required")
    );
    let state = store.snapshot();
    assert!(state.post_list.is_empty());
    assert!(!state.busy);
}

#[tokio::test]
async fn test_update_validation_failure_over_http() {
    let (base, _service) = spawn_service(vec![seeded("1", "One")]).await;
    let store = store_for(&base);
    let cancel = CancellationToken::new();
    store.list(&cancel).await.unwrap();

    store.start_editing("1");
    let mut form = store.snapshot().editing_post.unwrap();
    form.publish_date.clear();
    let err = store.update("1".into(), form, &cancel).await.unwrap_err();

    assert_eq!(
        err.validation_errors().and_then(|e| e.get("publishDate")),
        Some("must be set")
    );
    assert!(store.snapshot().is_editing());
}

#[tokio::test]
async fn test_server_error_is_unrecovered() {
    let (base, _service) = spawn_service(vec![]).await;
    let store = store_for(&base);

    let err = store
        .create(draft("explode"), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        OperationError::Failed(ApiError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!store.is_busy());
}

#[tokio::test]
async fn test_update_of_deleted_post_is_not_found() {
    let (base, service) = spawn_service(vec![seeded("1", "One")]).await;
    let store = store_for(&base);
    let cancel = CancellationToken::new();
    store.list(&cancel).await.unwrap();

    store.start_editing("1");
    service.posts.lock().unwrap().clear();
    let form = store.snapshot().editing_post.unwrap();
    let err = store.update("1".into(), form, &cancel).await.unwrap_err();

    assert!(matches!(
        err,
        OperationError::Failed(ApiError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_cancelling_aborts_in_flight_request() {
    let (base, service) = spawn_service(vec![]).await;
    let store = store_for(&base);
    let cancel = CancellationToken::new();

    let task = {
        let store = store.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { store.create(draft("slow"), &cancel).await })
    };
    store.subscribe().wait_for(|s| s.busy).await.unwrap();
    cancel.cancel();

    let err = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("cancellation should settle promptly")
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, OperationError::Cancelled));
    assert!(!store.is_busy());
    assert!(store.snapshot().post_list.is_empty());
    assert!(service.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failure_against_closed_port() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpPostsApi::new(&ClientConfig {
        base_url: format!("http://{addr}/"),
        timeout_ms: 2_000,
    })
    .unwrap();
    let err = api.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
