use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::Config;
use crate::vision::VisionModel;

/* ---------- App state ---------- */
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<dyn VisionModel>,
    pub config: Config,
}

/* ---------- API models ---------- */

/// What the model is asked to fill in. The upload route checks answers
/// against this shape at debug level but relays the model's JSON untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceAttributes {
    pub brand: String,
    pub year: String,
    pub freestanding: bool,
    pub has_fridge: bool,
    pub total_volume: String,
}

#[derive(Serialize, Debug)]
pub struct UploadResponse {
    pub result: JsonValue,
    /// The uploaded bytes, base64-encoded.
    pub image: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BrandUpdateAck {
    pub success: bool,
    pub message: String,
}
