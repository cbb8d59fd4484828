pub mod concept_crud;
pub mod insight_ops;

use chrono::{DateTime, Utc};

use incubator_core::errors::IncubatorResult;

use crate::to_storage_err;

pub(crate) fn parse_dt(s: &str) -> IncubatorResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}
