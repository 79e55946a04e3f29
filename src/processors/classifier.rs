use chrono::{DateTime, Utc};

use crate::utils::constants::{BUCKET_HOURS, FIRST_LIVE_BUCKET_INDEX, FORECAST_TYPE_IDS};

/// Assigns forecast valid times to lead-time buckets relative to a fixed
/// reference time.
///
/// Buckets advance every [`BUCKET_HOURS`] hours of lead. Valid times before
/// the first cadence boundary, look-back hours included, collapse into the
/// first live bucket; the look-back bucket ids below it stay addressable
/// through [`BucketClassifier::forecast_type_id`].
#[derive(Debug, Clone, Copy)]
pub struct BucketClassifier {
    reference: DateTime<Utc>,
}

impl BucketClassifier {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self { reference }
    }

    /// Bucket id for a valid time, or `None` past the forecast horizon.
    pub fn classify(&self, timestamp: DateTime<Utc>) -> Option<i64> {
        let lead_hours = (timestamp - self.reference).num_hours();
        let index = if lead_hours < 0 {
            FIRST_LIVE_BUCKET_INDEX
        } else {
            FIRST_LIVE_BUCKET_INDEX + lead_hours / BUCKET_HOURS
        };
        Self::forecast_type_id(index)
    }

    /// Bucket id for a raw bucket index. Out-of-range indices yield `None`.
    pub fn forecast_type_id(index: i64) -> Option<i64> {
        usize::try_from(index)
            .ok()
            .and_then(|index| FORECAST_TYPE_IDS.get(index))
            .copied()
    }

    /// Lead-hour window covered by a bucket index. Drives the descriptions
    /// seeded into the `forecast_types` table.
    pub fn lead_window(index: usize) -> Option<(i64, i64)> {
        if index >= FORECAST_TYPE_IDS.len() {
            return None;
        }
        let start = BUCKET_HOURS * (index as i64 - FIRST_LIVE_BUCKET_INDEX);
        Some((start, start + BUCKET_HOURS - 1))
    }
}
