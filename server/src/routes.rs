use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use neuromatrix_api::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::agent::MintingAgent;
use crate::chain::ChainReader;
use crate::config::Config;
use crate::lookup::lookup_pass;
use crate::mint::mint_pass;
use crate::store::CounterStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn CounterStore>,
    pub agent: Arc<dyn MintingAgent>,
    pub chain: Arc<dyn ChainReader>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/counter", get(get_counter).post(increment_counter))
        .route("/mint", post(mint))
        .route("/nft/:address", get(lookup_get).post(lookup_post))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

/// Map a gateway error onto a fixed status and a generic body. Detail
/// stays in the server logs; nothing internal reaches the client.
fn error_response(err: GatewayError) -> ApiError {
    let (status, message) = match &err {
        GatewayError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "Invalid wallet address"),
        GatewayError::MintFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to mint NFT"),
        GatewayError::Configuration(_)
        | GatewayError::NotFound(_)
        | GatewayError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };
    tracing::error!(error = ?err, "request failed");
    (status, Json(json!({ "error": message })))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CounterResponse {
    counter: GlobalCounter,
    latest_task: Task,
}

async fn get_counter(State(state): State<AppState>) -> Result<Json<CounterResponse>, ApiError> {
    let counter = state.store.counter().await.map_err(error_response)?;
    let latest_task = state.store.latest_task().await.map_err(error_response)?;
    Ok(Json(CounterResponse {
        counter,
        latest_task,
    }))
}

async fn increment_counter(
    State(state): State<AppState>,
) -> Result<Json<CounterResponse>, ApiError> {
    let counter = state.store.increment().await.map_err(error_response)?;
    let latest_task = state.store.latest_task().await.map_err(error_response)?;
    Ok(Json(CounterResponse {
        counter,
        latest_task,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintRequest {
    wallet_address: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MintResponse {
    success: bool,
    nft_address: String,
    wallet_address: String,
    metadata: NftMetadata,
    message: &'static str,
}

async fn mint(
    State(state): State<AppState>,
    payload: Option<Json<MintRequest>>,
) -> Result<Json<MintResponse>, ApiError> {
    let Some(wallet_address) = payload.and_then(|Json(request)| request.wallet_address) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Wallet address is required" })),
        ));
    };

    let (receipt, metadata) = mint_pass(state.agent.as_ref(), &state.config, &wallet_address)
        .await
        .map_err(error_response)?;

    tracing::info!(mint = %receipt.mint_address, recipient = %receipt.recipient, "minted pass");

    Ok(Json(MintResponse {
        success: true,
        nft_address: receipt.mint_address,
        wallet_address: receipt.recipient,
        metadata,
        message: "NFT minted successfully",
    }))
}

async fn lookup_get(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<MetadataView>, ApiError> {
    lookup_pass(
        state.chain.as_ref(),
        &state.config,
        &address,
        MetadataOverrides::default(),
    )
    .await
    .map(Json)
    .map_err(error_response)
}

async fn lookup_post(
    State(state): State<AppState>,
    Path(address): Path<String>,
    overrides: Option<Json<MetadataOverrides>>,
) -> Result<Json<MetadataView>, ApiError> {
    let overrides = overrides.map(|Json(o)| o).unwrap_or_default();
    lookup_pass(state.chain.as_ref(), &state.config, &address, overrides)
        .await
        .map(Json)
        .map_err(error_response)
}
