use anyhow::Context;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::alerts::services::{fan_out, OutgoingAlert};
use crate::realtime::hotspots::{self, Hotspot, BRIGHTNESS_TRIGGER, HOTSPOT_COUNT};
use crate::state::AppState;
use crate::store::Table;

pub struct FirmsOutcome {
    pub hotspots: Vec<Hotspot>,
    pub alerts_sent: bool,
    pub triggered: Vec<Hotspot>,
}

fn contact(user: &Value, key: &str) -> Option<String> {
    user.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Emails and phones of every user object that carries them.
pub fn recipients(users: &[Value]) -> (Vec<String>, Vec<String>) {
    let emails = users.iter().filter_map(|u| contact(u, "email")).collect();
    let phones = users.iter().filter_map(|u| contact(u, "phone")).collect();
    (emails, phones)
}

pub fn realtime_alert(
    project_name: Option<&str>,
    triggered: usize,
    users: &[Value],
) -> OutgoingAlert {
    let (to_emails, to_phones) = recipients(users);
    OutgoingAlert {
        to_emails,
        to_phones,
        subject: format!(
            "IgnisShield Realtime Alerts – {}",
            project_name.unwrap_or("Project")
        ),
        message: format!(
            "High fire risk at {} locations (brightness > {}).",
            triggered, BRIGHTNESS_TRIGGER
        ),
        source: "realtime".into(),
    }
}

/// Replaces the stored hotspot set with a fresh one and alerts `users` when
/// any hotspot crosses the brightness trigger.
pub async fn refresh_hotspots(
    state: &AppState,
    project_name: Option<&str>,
    users: &[Value],
) -> anyhow::Result<FirmsOutcome> {
    let today = OffsetDateTime::now_utc().date();
    let hotspots = state.with_rng(|rng| hotspots::generate(rng, HOTSPOT_COUNT, today));
    publish(state, hotspots, project_name, users).await
}

/// Stores `hotspots` as the current set and fans out one realtime alert if
/// any of them is triggered.
pub async fn publish(
    state: &AppState,
    hotspots: Vec<Hotspot>,
    project_name: Option<&str>,
    users: &[Value],
) -> anyhow::Result<FirmsOutcome> {
    let rows = hotspots
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .context("encode hotspots")?;
    state.store.save(Table::Hotspots, rows).await?;

    let triggered = hotspots::triggered(&hotspots);
    debug!(generated = hotspots.len(), triggered = triggered.len(), "hotspots refreshed");

    let alerts_sent = !triggered.is_empty();
    if alerts_sent {
        let alert = realtime_alert(project_name, triggered.len(), users);
        let delivered = fan_out(state.store.as_ref(), alert).await?;
        info!(triggered = triggered.len(), delivered = delivered.len(), "realtime alerts sent");
    }

    Ok(FirmsOutcome {
        hotspots,
        alerts_sent,
        triggered,
    })
}
