use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use notez::backend::http::HttpBackend;
use notez::backend::NotesBackend;
use notez::client::{NoteEditorClient, SaveOutcome};
use notez::error::{FailureKind, NotezError};
use notez::model::{NoteId, NotePayload};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// A request as seen by the stub service: method, path, JSON body.
type Seen = (String, String, Option<Value>);

#[derive(Clone, Default)]
struct Stub {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    fn record(&self, method: &str, path: String, body: Option<Value>) {
        self.seen
            .lock()
            .unwrap()
            .push((method.to_string(), path, body));
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn stored_notes() -> Value {
    json!([
        {"id": 2, "title": "Shaders", "content": "GLSL", "tags": "webgl, shaders",
         "created_at": "2024-03-01T09:00:00", "updated_at": "2024-03-05T14:07:09.123456"},
        {"id": 1, "title": "A", "content": "", "tags": ["x"],
         "created_at": "2024-03-01T08:00:00", "updated_at": "2024-03-01T08:00:00"}
    ])
}

async fn list(State(stub): State<Stub>) -> Json<Value> {
    stub.record("GET", "/notes".into(), None);
    Json(stored_notes())
}

async fn get_one(
    State(stub): State<Stub>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    stub.record("GET", format!("/notes/{}", id), None);
    let notes = stored_notes();
    notes
        .as_array()
        .and_then(|all| all.iter().find(|n| n["id"].to_string() == id).cloned())
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Note not found"})),
        ))
}

async fn create(State(stub): State<Stub>, Json(body): Json<Value>) -> Json<Value> {
    stub.record("POST", "/notes".into(), Some(body.clone()));
    Json(json!({
        "id": 3,
        "title": body["title"],
        "content": body["content"],
        "tags": body["tags"],
        "created_at": "2024-03-06T10:00:00",
        "updated_at": "2024-03-06T10:00:00"
    }))
}

async fn update(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record("PUT", format!("/notes/{}", id), Some(body.clone()));
    Json(json!({
        "id": id.parse::<i64>().unwrap_or(-1),
        "title": body["title"],
        "content": body["content"],
        "tags": body["tags"],
        "updated_at": "2024-03-06T11:00:00"
    }))
}

async fn remove(State(stub): State<Stub>, Path(id): Path<String>) -> StatusCode {
    stub.record("DELETE", format!("/notes/{}", id), None);
    StatusCode::NO_CONTENT
}

async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/notes", get(list).post(create))
        .route("/notes/:id", get(get_one).put(update).delete(remove))
        .route("/health", get(health))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), stub)
}

fn payload(title: &str, tags: &str) -> NotePayload {
    NotePayload {
        title: title.to_string(),
        content: "body".to_string(),
        tags: tags.to_string(),
    }
}

#[tokio::test]
async fn lists_notes_with_either_tag_shape() {
    let (url, stub) = spawn_stub().await;
    let backend = HttpBackend::new(&url).unwrap();

    let notes = backend.list_notes().await.unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, NoteId::new("2"));
    assert_eq!(notes[0].tags.to_text(), "webgl, shaders");
    assert_eq!(notes[1].tags.to_text(), "x");
    assert!(notes[0].updated_at.is_some());
    assert_eq!(stub.seen()[0].1, "/notes");
}

#[tokio::test]
async fn missing_note_is_a_status_error() {
    let (url, _stub) = spawn_stub().await;
    let backend = HttpBackend::new(&url).unwrap();

    let note = backend.get_note(&NoteId::new("1")).await.unwrap();
    assert_eq!(note.title, "A");

    let err = backend.get_note(&NoteId::new("404")).await.unwrap_err();
    match err {
        NotezError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Note not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn create_posts_raw_tag_text() {
    let (url, stub) = spawn_stub().await;
    let backend = HttpBackend::new(&url).unwrap();

    let note = backend.create_note(&payload("New", "a,b")).await.unwrap();

    assert_eq!(note.id, NoteId::new("3"));
    let (method, path, body) = stub.seen().remove(0);
    assert_eq!((method.as_str(), path.as_str()), ("POST", "/notes"));
    assert_eq!(
        body.unwrap(),
        json!({"title": "New", "content": "body", "tags": "a,b"})
    );
}

#[tokio::test]
async fn update_puts_to_the_note_path() {
    let (url, stub) = spawn_stub().await;
    let backend = HttpBackend::new(&url).unwrap();

    let note = backend
        .update_note(&NoteId::new("1"), &payload("A2", ""))
        .await
        .unwrap();

    assert_eq!(note.title, "A2");
    let (method, path, _) = stub.seen().remove(0);
    assert_eq!((method.as_str(), path.as_str()), ("PUT", "/notes/1"));
}

#[tokio::test]
async fn delete_accepts_an_empty_response() {
    let (url, stub) = spawn_stub().await;
    let backend = HttpBackend::new(&url).unwrap();

    backend.delete_note(&NoteId::new("2")).await.unwrap();

    let (method, path, _) = stub.seen().remove(0);
    assert_eq!((method.as_str(), path.as_str()), ("DELETE", "/notes/2"));
}

#[tokio::test]
async fn health_reports_ok() {
    let (url, _stub) = spawn_stub().await;
    let backend = HttpBackend::new(&format!("{}/", url)).unwrap();
    assert!(backend.health().await.unwrap());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&format!("http://{}", addr)).unwrap();
    let err = backend.list_notes().await.unwrap_err();
    assert!(matches!(err, NotezError::Http(_)));

    let mut client = NoteEditorClient::new(backend);
    let failure = client.activate().await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::ListLoadFailed);
    assert!(client.notes().is_empty());
}

#[tokio::test]
async fn controller_over_http_creates_then_updates() {
    let (url, stub) = spawn_stub().await;
    let mut client = NoteEditorClient::new(HttpBackend::new(&url).unwrap());

    client.activate().await.unwrap();
    client.set_title("T");
    let outcome = client.save_note().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved(ref n) if n.id == NoteId::new("3")));

    client.load_note(&NoteId::new("1")).await.unwrap();
    assert_eq!(client.draft().tags_text, "x");
    client.set_content("more");
    client.save_note().await.unwrap();

    let methods: Vec<String> = stub
        .seen()
        .into_iter()
        .map(|(m, p, _)| format!("{} {}", m, p))
        .collect();
    assert_eq!(
        methods,
        vec![
            "GET /notes",
            "POST /notes",
            "GET /notes",
            "GET /notes/1",
            "PUT /notes/1",
            "GET /notes",
        ]
    );
}
