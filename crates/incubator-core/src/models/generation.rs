use serde::{Deserialize, Serialize};

use crate::content::ContentBlock;

/// Every distinct prompt the provider client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Pitch,
    Feasibility,
    MarketInsights,
    RiskAssessment,
    ImplementationRoadmap,
    TitleOptimization,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pitch => "pitch",
            Self::Feasibility => "feasibility",
            Self::MarketInsights => "market_insights",
            Self::RiskAssessment => "risk_assessment",
            Self::ImplementationRoadmap => "implementation_roadmap",
            Self::TitleOptimization => "title_optimization",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prompt handed to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    pub concept_id: String,
    pub prompt: String,
}

/// Normalized output of an enhancement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementDraft {
    pub pitch: Vec<ContentBlock>,
    pub market_potential: f64,
    pub technical_complexity: f64,
    pub resource_requirements: f64,
    pub is_ai_generated: bool,
    pub retries: u32,
}

/// Normalized output of an insights generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightDraft {
    pub market_insights: Vec<ContentBlock>,
    pub risk_assessment: Vec<ContentBlock>,
    pub implementation_roadmap: Vec<ContentBlock>,
    pub is_ai_generated: bool,
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSuggestions {
    pub suggestions: Vec<ContentBlock>,
    pub is_ai_generated: bool,
}
