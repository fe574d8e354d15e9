//! Connection server
//!
//! Accepts connections and runs each on its own task: read one request,
//! run the search, write one response, close. Workers share the engine
//! (and through it the catalog) read-only; a failure in one connection
//! never touches another.

use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

use crate::error::Result;
use crate::protocol::{read_request, write_response, DishPayload, Response};
use crate::search::SearchEngine;

/// Accept connections until the listener fails
pub async fn serve(listener: TcpListener, engine: Arc<SearchEngine>) -> Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let engine = engine.clone();
        tokio::spawn(async move {
            tracing::debug!(%peer, "connection accepted");
            handle_connection(stream, engine).await;
            tracing::debug!(%peer, "connection closed");
        });
    }
}

/// One request/response cycle; the socket is released on every exit path
async fn handle_connection(stream: TcpStream, engine: Arc<SearchEngine>) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // Framing errors get no response: there is no agreed channel to answer on.
    let request = match read_request(&mut reader).await {
        Ok(Some(request)) => request,
        Ok(None) => {
            tracing::warn!("peer closed before sending a request");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to decode request");
            return;
        }
    };

    tracing::info!(query = %request.query, "received request");
    let response = respond(&engine, &request.query);

    if let Err(e) = write_response(&mut write_half, &response).await {
        tracing::warn!(error = %e, "failed to write response");
    }
}

/// Run the search and classify failures at the response boundary
fn respond(engine: &SearchEngine, query: &str) -> Response {
    match engine.search(query) {
        Ok(hits) => {
            let dishes = hits
                .iter()
                .filter_map(|hit| engine.catalog().dish(hit.dish))
                .map(DishPayload::from)
                .collect();
            Response::success(dishes)
        }
        Err(e) if e.is_user_caused() => {
            tracing::info!(query, error = %e, "rejected query");
            Response::failure(format!("Failed while processing data for {query}: {e}"))
        }
        Err(e) => {
            // Full detail stays server-side.
            tracing::error!(query, error = %e, "search failed");
            Response::failure("Internal server error.")
        }
    }
}
