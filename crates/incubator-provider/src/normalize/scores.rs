//! Feasibility score extraction from a JSON response.

use serde_json::Value;

use incubator_core::errors::ProviderError;
use incubator_core::scoring::clamp_score;

/// The three feasibility sub-scores, clamped to `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub market_potential: f64,
    pub technical_complexity: f64,
    pub resource_requirements: f64,
}

impl SubScores {
    pub fn new(market_potential: f64, technical_complexity: f64, resource_requirements: f64) -> Self {
        Self {
            market_potential: clamp_score(market_potential),
            technical_complexity: clamp_score(technical_complexity),
            resource_requirements: clamp_score(resource_requirements),
        }
    }
}

/// Parse a scoring response. The JSON object may be wrapped in a code fence
/// or surrounded by prose; extra fields are ignored. Numbers given as strings
/// are accepted.
pub fn parse_scores(text: &str) -> Result<SubScores, ProviderError> {
    let body = strip_fence(text.trim());
    let start = body.find('{');
    let end = body.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &body[s..=e],
        _ => return Err(malformed("no JSON object in scoring response")),
    };
    let value: Value =
        serde_json::from_str(json).map_err(|e| malformed(&format!("invalid scoring JSON: {e}")))?;

    Ok(SubScores::new(
        field(&value, "market_potential")?,
        field(&value, "technical_complexity")?,
        field(&value, "resource_requirements")?,
    ))
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn field(value: &Value, name: &str) -> Result<f64, ProviderError> {
    let raw = value
        .get(name)
        .ok_or_else(|| malformed(&format!("missing field {name}")))?;
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(malformed(&format!("field {name} is not a number"))),
    }
}

fn malformed(reason: &str) -> ProviderError {
    ProviderError::MalformedResponse {
        reason: reason.to_string(),
    }
}
