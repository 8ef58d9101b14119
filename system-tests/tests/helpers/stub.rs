// system-tests/tests/helpers/stub.rs
// ============================================================================
// Module: Book Store Stub
// Description: Minimal in-process Book Store server for system-tests.
// Purpose: Exercise the scenario against controlled responses.
// Dependencies: axum, bookstore-conformance-core
// ============================================================================

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use bookstore_conformance_core::scenario::BOOKS_PATH;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Shared responder state for the stub server.
#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    hits: Arc<Mutex<u64>>,
}

/// Handle for the stub Book Store server.
pub struct BookStoreStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    hits: Arc<Mutex<u64>>,
}

impl BookStoreStubHandle {
    /// Returns the stub base URL without a trailing path.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns how many books requests the stub has served.
    pub fn request_count(&self) -> u64 {
        self.hits.lock().map_or(0, |hits| *hits)
    }
}

impl Drop for BookStoreStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Returns the canned shelf fixture mirroring the live demo service.
///
/// The first record is the one the scenario verifies field-by-field.
pub fn demo_bookshelf() -> Value {
    json!({
        "books": [
            {
                "isbn": "9781449325862",
                "title": "Git Pocket Guide",
                "subTitle": "A Working Introduction",
                "author": "Richard E. Silverman",
                "publish_date": "2020-06-04T08:48:39.000Z",
                "publisher": "O'Reilly Media",
                "pages": 234,
                "description": "This pocket guide is the perfect on-the-job companion to Git, the distributed version control system.",
                "website": "http://chimera.labs.oreilly.com/books/1230000000561/index.html"
            },
            {
                "isbn": "9781449331818",
                "title": "Learning JavaScript Design Patterns",
                "subTitle": "A JavaScript and jQuery Developer's Guide",
                "author": "Addy Osmani",
                "publish_date": "2020-06-04T09:11:40.000Z",
                "publisher": "O'Reilly Media",
                "pages": 254,
                "description": "With Learning JavaScript Design Patterns, you'll learn how to write beautiful, structured, and maintainable JavaScript.",
                "website": "http://www.addyosmani.com/resources/essentialjsdesignpatterns/book/"
            }
        ]
    })
}

/// Spawns a stub Book Store server answering the books route.
pub fn spawn_book_store_stub(status: u16, body: String) -> Result<BookStoreStubHandle, String> {
    let status = StatusCode::from_u16(status)
        .map_err(|err| format!("invalid stub status {status}: {err}"))?;
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("book store stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("book store stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("book store stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let hits = Arc::new(Mutex::new(0));
    let state = StubState {
        status,
        body,
        hits: Arc::clone(&hits),
    };
    let app = Router::new().route(BOOKS_PATH, get(handle_books)).with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let runtime = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(error) => {
                let _ = error;
                return;
            }
        };
        runtime.block_on(async move {
            let listener = match tokio::net::TcpListener::from_std(listener) {
                Ok(listener) => listener,
                Err(error) => {
                    let _ = error;
                    return;
                }
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(BookStoreStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        hits,
    })
}

/// Serves the configured response for the books route.
async fn handle_books(State(state): State<StubState>) -> impl IntoResponse {
    if let Ok(mut hits) = state.hits.lock() {
        *hits = hits.saturating_add(1);
    }
    (state.status, [(header::CONTENT_TYPE, "application/json")], state.body.clone())
}
