//! Response shapes for the API layer. Field names serialize in camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use incubator_core::content::ContentBlock;
use incubator_core::errors::{IncubatorError, IncubatorErrorCode};
use incubator_core::models::{
    Concept, EnhancedConcept, InsightRecord, InsightSummary, Stage, TitleSuggestions,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub stage: Stage,
    pub refined_pitch: Option<String>,
    pub market_potential: f64,
    pub technical_complexity: f64,
    pub resource_requirements: f64,
    pub feasibility_score: f64,
    pub ai_validated: bool,
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Concept> for ConceptResponse {
    fn from(concept: &Concept) -> Self {
        Self {
            id: concept.id.clone(),
            title: concept.title.clone(),
            description: concept.description.clone(),
            stage: concept.stage,
            refined_pitch: concept.refined_pitch.clone(),
            market_potential: concept.market_potential,
            technical_complexity: concept.technical_complexity,
            resource_requirements: concept.resource_requirements,
            feasibility_score: concept.feasibility_score(),
            ai_validated: concept.ai_validated,
            is_ai_generated: concept.is_ai_generated,
            created_at: concept.created_at,
            updated_at: concept.updated_at,
        }
    }
}

/// Result of an enhancement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub idea_id: String,
    pub pitch: String,
    pub market_potential: f64,
    pub technical_complexity: f64,
    pub resource_requirements: f64,
    pub feasibility_score: f64,
    pub ai_validated: bool,
    pub is_ai_generated: bool,
}

impl From<&EnhancedConcept> for EnhanceResponse {
    fn from(enhanced: &EnhancedConcept) -> Self {
        let concept = &enhanced.concept;
        Self {
            idea_id: concept.id.clone(),
            pitch: concept.refined_pitch.clone().unwrap_or_default(),
            market_potential: concept.market_potential,
            technical_complexity: concept.technical_complexity,
            resource_requirements: concept.resource_requirements,
            feasibility_score: concept.feasibility_score(),
            ai_validated: concept.ai_validated,
            is_ai_generated: enhanced.is_ai_generated,
        }
    }
}

/// The current insights version for a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub idea_id: String,
    pub idea_title: String,
    pub market_insights: Vec<ContentBlock>,
    pub risk_assessment: Vec<ContentBlock>,
    pub implementation_roadmap: Vec<ContentBlock>,
    pub is_ai_generated: bool,
    pub generation_version: u32,
    pub generated_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl InsightsResponse {
    pub fn new(title: &str, record: InsightRecord) -> Self {
        Self {
            idea_id: record.idea_id,
            idea_title: title.to_string(),
            market_insights: record.market_insights,
            risk_assessment: record.risk_assessment,
            implementation_roadmap: record.implementation_roadmap,
            is_ai_generated: record.is_ai_generated,
            generation_version: record.generation_version,
            generated_at: record.generated_at,
            last_updated: record.last_updated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightVersion {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub is_ai_generated: bool,
}

impl From<&InsightSummary> for InsightVersion {
    fn from(summary: &InsightSummary) -> Self {
        Self {
            version: summary.version,
            generated_at: summary.generated_at,
            last_updated: summary.last_updated,
            is_ai_generated: summary.is_ai_generated,
        }
    }
}

/// Every insights version for a concept, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsHistoryResponse {
    pub has_insights: bool,
    pub insights_count: usize,
    pub current_version: Option<u32>,
    pub first_generated: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub is_ai_generated: Option<bool>,
    pub versions: Vec<InsightVersion>,
}

impl InsightsHistoryResponse {
    pub fn from_summaries(summaries: &[InsightSummary]) -> Self {
        let first = summaries.first();
        let current = summaries.last();
        Self {
            has_insights: !summaries.is_empty(),
            insights_count: summaries.len(),
            current_version: current.map(|s| s.version),
            first_generated: first.map(|s| s.generated_at),
            last_updated: current.map(|s| s.last_updated),
            is_ai_generated: current.map(|s| s.is_ai_generated),
            versions: summaries.iter().map(InsightVersion::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSuggestionsResponse {
    pub idea_id: String,
    pub current_title: String,
    pub suggestions: Vec<ContentBlock>,
    pub is_ai_generated: bool,
}

impl TitleSuggestionsResponse {
    pub fn new(concept: &Concept, suggestions: TitleSuggestions) -> Self {
        Self {
            idea_id: concept.id.clone(),
            current_title: concept.title.clone(),
            suggestions: suggestions.suggestions,
            is_ai_generated: suggestions.is_ai_generated,
        }
    }
}

/// Error body for the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&IncubatorError> for ErrorResponse {
    fn from(error: &IncubatorError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}
