use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::predict::services::Features;

/// Raw `/predict` body. Fields stay untyped so a bad value is reported by
/// name instead of as a generic decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PredictRequest {
    pub temperature: Option<Value>,
    pub humidity: Option<Value>,
    pub wind_speed: Option<Value>,
    pub vegetation_index: Option<Value>,
}

/// Absent and `null` read as 0; numbers and numeric strings are accepted.
fn number(field: &str, value: Option<Value>) -> Result<f64, AppError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|x| x.is_finite())
        .ok_or_else(|| AppError::TypeConversion(format!("{field} must be a number")))
}

impl TryFrom<PredictRequest> for Features {
    type Error = AppError;

    fn try_from(req: PredictRequest) -> Result<Self, Self::Error> {
        Ok(Features {
            temperature: number("temperature", req.temperature)?,
            humidity: number("humidity", req.humidity)?,
            wind_speed: number("wind_speed", req.wind_speed)?,
            vegetation_index: number("vegetation_index", req.vegetation_index)?,
        })
    }
}
