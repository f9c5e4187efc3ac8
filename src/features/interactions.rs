// HTTP interactions endpoint
// Discord POSTs signed interactions here; we verify, then answer PING and
// the `test` command. Anything else gets a 400 with a small JSON error.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serenity::interactions_endpoint::Verifier;
use serde_json::{json, Value};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::utils::config::ConfigError;
use crate::utils::emojis::random_emoji;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Interaction types
pub const PING: u64 = 1;
pub const APPLICATION_COMMAND: u64 = 2;

/// Interaction response types
pub const PONG: u8 = 1;
pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;

/// Message flag enabling layout components
pub const IS_COMPONENTS_V2: u64 = 1 << 15;
pub const TEXT_DISPLAY_COMPONENT: u8 = 10;

/// The parts of an interaction this endpoint looks at
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: u64,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("invalid request signature")]
    InvalidSignature,

    #[error("invalid interaction body: {0}")]
    MalformedBody(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown interaction type: {0}")]
    UnknownInteractionType(u64),
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            InteractionError::InvalidSignature => {
                (StatusCode::UNAUTHORIZED, "invalid request signature")
            }
            InteractionError::MalformedBody(_) => (StatusCode::BAD_REQUEST, "invalid interaction body"),
            InteractionError::UnknownCommand(_) => (StatusCode::BAD_REQUEST, "unknown command"),
            InteractionError::UnknownInteractionType(_) => {
                (StatusCode::BAD_REQUEST, "unknown interaction type")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Checks that a raw request really came from Discord and parses it
pub trait RequestVerifier: Send + Sync {
    fn verify_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<Interaction, InteractionError>;
}

/// Ed25519 signature check against the application's public key
pub struct Ed25519Verifier {
    verifier: Verifier,
}

impl Ed25519Verifier {
    /// `public_key` is the hex key from the developer portal
    pub fn new(public_key: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::Invalid {
            name: "PUBLIC_KEY",
            value: public_key.to_string(),
        };

        let bytes = decode_key(public_key).ok_or_else(invalid)?;
        // Rejects 32-byte values that are not a curve point
        let verifier = Verifier::try_new(bytes).map_err(|_| invalid())?;

        Ok(Self { verifier })
    }
}

fn decode_key(hex: &str) -> Option<[u8; 32]> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }

    let mut bytes = [0u8; 32];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(bytes)
}

impl RequestVerifier for Ed25519Verifier {
    fn verify_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<Interaction, InteractionError> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .ok_or(InteractionError::InvalidSignature)
        };
        let signature = header(SIGNATURE_HEADER)?;
        let timestamp = header(TIMESTAMP_HEADER)?;

        self.verifier
            .verify(signature, timestamp, body)
            .map_err(|_| InteractionError::InvalidSignature)?;

        parse_interaction(body)
    }
}

pub fn parse_interaction(body: &[u8]) -> Result<Interaction, InteractionError> {
    serde_json::from_slice(body).map_err(|e| InteractionError::MalformedBody(e.to_string()))
}

/// Answer a verified interaction
pub fn handle_interaction(interaction: &Interaction) -> Result<Value, InteractionError> {
    match interaction.kind {
        PING => Ok(json!({ "type": PONG })),
        APPLICATION_COMMAND => {
            let name = interaction
                .data
                .as_ref()
                .map(|d| d.name.as_str())
                .unwrap_or_default();

            if name == "test" {
                return Ok(json!({
                    "type": CHANNEL_MESSAGE_WITH_SOURCE,
                    "data": {
                        "flags": IS_COMPONENTS_V2,
                        "components": [
                            {
                                "type": TEXT_DISPLAY_COMPONENT,
                                "content": format!("hello world {}", random_emoji())
                            }
                        ]
                    }
                }));
            }

            error!("Unknown command: {}", name);
            Err(InteractionError::UnknownCommand(name.to_string()))
        }
        other => {
            error!("Unknown interaction type: {}", other);
            Err(InteractionError::UnknownInteractionType(other))
        }
    }
}

#[derive(Clone)]
pub struct InteractionState {
    pub verifier: Arc<dyn RequestVerifier>,
}

async fn interactions(
    State(state): State<InteractionState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, InteractionError> {
    let interaction = match state.verifier.verify_request(&headers, &body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!("Rejected interaction request: {}", e);
            return Err(e);
        }
    };

    info!(
        id = interaction.id.as_deref().unwrap_or("-"),
        kind = interaction.kind,
        "Interaction received"
    );

    handle_interaction(&interaction).map(Json)
}

pub fn router(verifier: Arc<dyn RequestVerifier>) -> Router {
    Router::new()
        .route("/interactions", post(interactions))
        .layer(TraceLayer::new_for_http())
        .with_state(InteractionState { verifier })
}

/// Serve the interactions endpoint until the process exits
pub async fn serve(port: u16, verifier: Arc<dyn RequestVerifier>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Interactions endpoint listening on port {}", port);
    axum::serve(listener, router(verifier)).await?;
    Ok(())
}
