//! How a series' samples map to time.

use nwbkit_config::TimingConflict;
use nwbkit_fields::{FieldMap, Value};
use serde::Serialize;
use tracing::warn;

use crate::error::{EntityError, Result};

/// Time base of a series, decided once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Timing {
    /// One timestamp per sample, held in the `timestamps` field
    Timestamps,
    /// Evenly spaced samples
    Regular { starting_time: f64, rate: f64 },
    /// Not known yet
    Unknown,
}

impl Timing {
    /// Time of sample `index`, for regular series.
    pub fn sample_time(&self, index: usize) -> Option<f64> {
        match self {
            Timing::Regular {
                starting_time,
                rate,
            } => Some(starting_time + index as f64 / rate),
            _ => None,
        }
    }

    /// Decide the time base from validated fields.
    ///
    /// Timestamps win over starting_time and rate, even a partial pair,
    /// unless `conflict` is [`TimingConflict::Reject`]. Without timestamps,
    /// starting_time and rate must come together and the rate must be finite
    /// and positive.
    pub fn resolve(fields: &FieldMap, conflict: TimingConflict) -> Result<Self> {
        let starting_time = fields.get("starting_time").and_then(Value::as_f64);
        let rate = fields.get("rate").and_then(Value::as_f64);

        if fields.is_set("timestamps") {
            if starting_time.is_none() && rate.is_none() {
                return Ok(Timing::Timestamps);
            }
            return match conflict {
                TimingConflict::Reject => Err(EntityError::AmbiguousTiming),
                TimingConflict::PreferTimestamps => {
                    warn!(
                        name = fields.get_str("name").unwrap_or_default(),
                        "timestamps given together with starting_time/rate, using timestamps"
                    );
                    Ok(Timing::Timestamps)
                }
            };
        }

        match (starting_time, rate) {
            (Some(_), Some(rate)) if !rate.is_finite() || rate <= 0.0 => {
                Err(EntityError::InvalidRate { rate })
            }
            (Some(starting_time), Some(rate)) => Ok(Timing::Regular {
                starting_time,
                rate,
            }),
            (Some(_), None) => Err(incomplete("starting_time", "rate")),
            (None, Some(_)) => Err(incomplete("rate", "starting_time")),
            (None, None) => Ok(Timing::Unknown),
        }
    }
}

fn incomplete(supplied: &str, missing: &str) -> EntityError {
    EntityError::IncompleteTiming {
        supplied: supplied.to_string(),
        missing: missing.to_string(),
    }
}
