use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentBlock;

/// One generated insights report. Versions per concept are 1, 2, 3, ...;
/// the highest version is current and older ones are kept as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub idea_id: String,
    pub generation_version: u32,
    pub market_insights: Vec<ContentBlock>,
    pub risk_assessment: Vec<ContentBlock>,
    pub implementation_roadmap: Vec<ContentBlock>,
    pub is_ai_generated: bool,
    pub generated_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl InsightRecord {
    pub fn summary(&self) -> InsightSummary {
        InsightSummary {
            version: self.generation_version,
            generated_at: self.generated_at,
            last_updated: self.last_updated,
            is_ai_generated: self.is_ai_generated,
        }
    }
}

/// History entry without the report bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub is_ai_generated: bool,
}

/// Append request for the insight store.
///
/// `previous_version` is the version the writer based its generation on
/// (0 when there was none). The store assigns `previous_version + 1` and
/// rejects the append with a version conflict if the current version moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInsightRecord {
    pub idea_id: String,
    pub previous_version: u32,
    pub market_insights: Vec<ContentBlock>,
    pub risk_assessment: Vec<ContentBlock>,
    pub implementation_roadmap: Vec<ContentBlock>,
    pub is_ai_generated: bool,
    pub generated_at: DateTime<Utc>,
}

impl NewInsightRecord {
    pub fn next_version(&self) -> u32 {
        self.previous_version + 1
    }

    pub fn into_record(self) -> InsightRecord {
        let generation_version = self.next_version();
        InsightRecord {
            idea_id: self.idea_id,
            generation_version,
            market_insights: self.market_insights,
            risk_assessment: self.risk_assessment,
            implementation_roadmap: self.implementation_roadmap,
            is_ai_generated: self.is_ai_generated,
            generated_at: self.generated_at,
            last_updated: self.generated_at,
        }
    }
}
