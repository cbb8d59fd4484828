use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DESCRIPTION_MAX_CHARS, DESCRIPTION_MIN_CHARS, NEUTRAL_SCORE, TITLE_MAX_CHARS,
};
use crate::errors::ValidationError;
use crate::scoring::{clamp_score, FeasibilityScorer};

/// Development stage of a concept. Ordered from earliest to latest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Concept,
    Research,
    Prototype,
    Testing,
    Launch,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Concept,
        Stage::Research,
        Stage::Prototype,
        Stage::Testing,
        Stage::Launch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Research => "research",
            Self::Prototype => "prototype",
            Self::Testing => "testing",
            Self::Launch => "launch",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == needle)
            .ok_or_else(|| ValidationError::UnknownStage {
                value: s.to_string(),
            })
    }
}

/// A user-submitted innovation concept.
///
/// `feasibility_score` is never stored; it is always derived from the three
/// sub-scores through [`FeasibilityScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub title: String,
    pub description: String,
    pub stage: Stage,
    /// Canonical text of the normalized pitch. Set only by enhancement.
    pub refined_pitch: Option<String>,
    pub market_potential: f64,
    pub technical_complexity: f64,
    pub resource_requirements: f64,
    /// Set once an enhancement run has written pitch and scores.
    pub ai_validated: bool,
    /// False when the latest enhancement used templated fallback content.
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Concept {
    /// Build a fresh, un-enhanced concept from validated input.
    pub fn new(id: impl Into<String>, input: NewConcept) -> Result<Self, ValidationError> {
        let input = input.validated()?;
        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            title: input.title,
            description: input.description,
            stage: input.stage,
            refined_pitch: None,
            market_potential: NEUTRAL_SCORE,
            technical_complexity: NEUTRAL_SCORE,
            resource_requirements: NEUTRAL_SCORE,
            ai_validated: false,
            is_ai_generated: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn feasibility_score(&self) -> f64 {
        FeasibilityScorer::score(
            self.market_potential,
            self.technical_complexity,
            self.resource_requirements,
        )
    }

    pub fn snapshot(&self) -> ConceptSnapshot {
        ConceptSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            stage: self.stage,
            refined_pitch: self.refined_pitch.clone(),
        }
    }

    /// Apply a validated update in place and bump `updated_at`.
    pub fn apply(&mut self, update: &ConceptUpdate) -> Result<(), ValidationError> {
        let update = update.validated()?;
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(stage) = update.stage {
            self.stage = stage;
        }
        if let Some(patch) = update.enhancement {
            self.refined_pitch = Some(patch.refined_pitch);
            self.market_potential = clamp_score(patch.market_potential);
            self.technical_complexity = clamp_score(patch.technical_complexity);
            self.resource_requirements = clamp_score(patch.resource_requirements);
            self.ai_validated = true;
            self.is_ai_generated = patch.is_ai_generated;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Input for creating a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConcept {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub stage: Stage,
}

impl NewConcept {
    pub fn new(title: impl Into<String>, description: impl Into<String>, stage: Stage) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            stage,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }

    /// Validate and return a copy with trimmed text fields.
    pub fn validated(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            stage: self.stage,
        })
    }
}

/// Fields written by a completed enhancement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementPatch {
    pub refined_pitch: String,
    pub market_potential: f64,
    pub technical_complexity: f64,
    pub resource_requirements: f64,
    pub is_ai_generated: bool,
}

/// Partial update of a concept. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub stage: Option<Stage>,
    #[serde(skip)]
    pub enhancement: Option<EnhancementPatch>,
}

impl ConceptUpdate {
    pub fn enhancement(patch: EnhancementPatch) -> Self {
        Self {
            enhancement: Some(patch),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(patch) = &self.enhancement {
            if patch.refined_pitch.trim().is_empty() {
                return Err(ValidationError::Empty {
                    field: "refined_pitch".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validated(&self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(Self {
            title: self.title.as_deref().map(|t| t.trim().to_string()),
            description: self.description.as_deref().map(|d| d.trim().to_string()),
            stage: self.stage,
            enhancement: self.enhancement.clone(),
        })
    }
}

/// The read-only view of a concept handed to the provider client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSnapshot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub stage: Stage,
    pub refined_pitch: Option<String>,
}

impl ConceptSnapshot {
    /// A snapshot is usable for generation when title and description carry text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "title".to_string(),
            });
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "description".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::Empty {
            field: "title".to_string(),
        });
    }
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: TITLE_MAX_CHARS,
            actual: len,
        });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let len = description.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::Empty {
            field: "description".to_string(),
        });
    }
    if len < DESCRIPTION_MIN_CHARS {
        return Err(ValidationError::TooShort {
            field: "description".to_string(),
            min: DESCRIPTION_MIN_CHARS,
            actual: len,
        });
    }
    if len > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: DESCRIPTION_MAX_CHARS,
            actual: len,
        });
    }
    Ok(())
}
