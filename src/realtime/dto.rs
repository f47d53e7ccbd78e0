use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::realtime::hotspots::Hotspot;

/// `POST /realtime/firms` body. An `api_key` may be sent; it is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FirmsRequest {
    pub project_name: Option<String>,
    pub users: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
pub struct FirmsResponse {
    pub ok: bool,
    pub hotspots: Vec<Hotspot>,
    pub alerts_sent: bool,
    pub triggered_hotspots: Vec<Hotspot>,
}

/// `POST /realtime/profiles` body. Nested users are stored as sent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProfileRequest {
    pub project_name: Option<String>,
    pub api_key: Option<String>,
    pub users: Option<Vec<Value>>,
}
