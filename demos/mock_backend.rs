//! Local targets for trying the monitor by hand.
//!
//! ```text
//! cargo run --example mock_backend
//! ```
//!
//! Point `targets` at these routes:
//! - `http://127.0.0.1:8081/`      healthy
//! - `http://127.0.0.1:8081/slow`  answers after 2s (past the default timeout)
//! - `http://127.0.0.1:8081/fail`  always 500
//! - `http://127.0.0.1:8081/flaky` alternates 200 and 503

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let calls = Arc::new(AtomicU64::new(0));

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "eventually ok"
            }),
        )
        .route(
            "/fail",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "broken") }),
        )
        .route("/flaky", get(flaky))
        .with_state(calls);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8081));
    println!("Mock targets listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn flaky(State(calls): State<Arc<AtomicU64>>) -> (StatusCode, &'static str) {
    if calls.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "try again")
    }
}
