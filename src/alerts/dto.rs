use serde::{Deserialize, Serialize};

use crate::alerts::services::{Delivery, OutgoingAlert};

/// `POST /alert` body. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertRequest {
    pub to_emails: Option<Vec<String>>,
    pub to_phones: Option<Vec<String>>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
}

impl From<AlertRequest> for OutgoingAlert {
    fn from(req: AlertRequest) -> Self {
        Self {
            to_emails: req.to_emails.unwrap_or_default(),
            to_phones: req.to_phones.unwrap_or_default(),
            subject: req.subject.unwrap_or_default(),
            message: req.message.unwrap_or_default(),
            source: req.source.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub ok: bool,
    pub delivered_count: usize,
    pub delivered: Vec<Delivery>,
}
