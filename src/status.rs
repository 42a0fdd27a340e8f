use axum::{extract::State, Json};
use serde::Serialize;

use crate::{state::AppState, store::Collection};

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StoreStatus {
    pub backend: &'static str,
    pub database: &'static str,
    pub collections: Vec<&'static str>,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Character Creator API",
    })
}

/// Reports whether the document store is configured and answering.
pub async fn test_database(State(state): State<AppState>) -> Json<StoreStatus> {
    let connected = match state.store() {
        Ok(store) => match store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "store ping failed");
                false
            }
        },
        Err(_) => false,
    };

    Json(StoreStatus {
        backend: "Running",
        database: if connected { "Connected" } else { "Not Available" },
        collections: if connected {
            Collection::ALL.iter().map(|c| c.name()).collect()
        } else {
            Vec::new()
        },
    })
}
