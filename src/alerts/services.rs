use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::store::{ListStore, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

/// There is no real transport, so nothing ever fails or queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    Sent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub to: String,
    pub channel: Channel,
    pub status: DeliveryStatus,
}

/// Audit entry appended to `alerts.json` for every fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub subject: String,
    pub message: String,
    pub source: String,
    pub delivered: Vec<Delivery>,
}

#[derive(Debug, Clone, Default)]
pub struct OutgoingAlert {
    pub to_emails: Vec<String>,
    pub to_phones: Vec<String>,
    pub subject: String,
    pub message: String,
    pub source: String,
}

/// One delivery per recipient, emails first, input order kept.
pub fn deliveries(to_emails: &[String], to_phones: &[String]) -> Vec<Delivery> {
    let email = to_emails.iter().map(|to| (to, Channel::Email));
    let sms = to_phones.iter().map(|to| (to, Channel::Sms));
    email
        .chain(sms)
        .map(|(to, channel)| Delivery {
            to: to.clone(),
            channel,
            status: DeliveryStatus::Sent,
        })
        .collect()
}

/// "Sends" `alert` to every recipient and records it in the alert log.
pub async fn fan_out(store: &dyn ListStore, alert: OutgoingAlert) -> anyhow::Result<Vec<Delivery>> {
    let delivered = deliveries(&alert.to_emails, &alert.to_phones);
    let record = AlertRecord {
        timestamp: OffsetDateTime::now_utc(),
        subject: alert.subject,
        message: alert.message,
        source: alert.source,
        delivered: delivered.clone(),
    };

    store
        .append(Table::Alerts, serde_json::to_value(&record)?)
        .await?;
    info!(
        subject = %record.subject,
        source = %record.source,
        emails = alert.to_emails.len(),
        phones = alert.to_phones.len(),
        "alert dispatched"
    );
    Ok(delivered)
}
