//! Simulated satellite thermal anomalies over California.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::Date;

pub const HOTSPOT_COUNT: usize = 15;

pub const LATITUDE: RangeInclusive<f64> = 32.5..=42.0;
pub const LONGITUDE: RangeInclusive<f64> = -124.5..=-114.0;
pub const BRIGHTNESS: RangeInclusive<f64> = 300.0..=400.0;

/// Hotspots strictly brighter than this trigger an alert.
pub const BRIGHTNESS_TRIGGER: f64 = 330.0;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Satellite {
    A,
    T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub brightness: f64,
    #[serde(with = "iso_date")]
    pub acq_date: Date,
    pub satellite: Satellite,
}

impl Hotspot {
    pub fn is_triggered(&self) -> bool {
        self.brightness > BRIGHTNESS_TRIGGER
    }
}

fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round() / scale
}

/// `n` hotspots with independent uniform draws per field, all dated `today`.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, n: usize, today: Date) -> Vec<Hotspot> {
    (0..n)
        .map(|i| Hotspot {
            id: format!("hot_{i:03}"),
            latitude: round_to(rng.gen_range(LATITUDE), 5),
            longitude: round_to(rng.gen_range(LONGITUDE), 5),
            brightness: round_to(rng.gen_range(BRIGHTNESS), 1),
            acq_date: today,
            satellite: if rng.gen_bool(0.5) { Satellite::A } else { Satellite::T },
        })
        .collect()
}

pub fn triggered(hotspots: &[Hotspot]) -> Vec<Hotspot> {
    hotspots.iter().filter(|h| h.is_triggered()).cloned().collect()
}
