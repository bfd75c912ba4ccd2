use crate::projector::Projection;
use ctxnav_core::config::HybridConfig;
use ctxnav_core::model::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_STEPS: u32 = 100;
const MIN_THRESHOLD: f32 = 0.0;
const MAX_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    Shortest,
    #[default]
    #[serde(alias = "semantic")]
    Weighted,
    Exploratory,
    Hybrid,
}

impl std::fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NavigationMode::Shortest => "shortest",
            NavigationMode::Weighted => "weighted",
            NavigationMode::Exploratory => "exploratory",
            NavigationMode::Hybrid => "hybrid",
        };
        write!(f, "{}", s)
    }
}

/// Output shape of an exploratory traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NavigationFormat {
    /// Spanning-tree edges only.
    Tree,
    /// Every accepted edge, cycles included.
    #[default]
    Graph,
}

/// Per-query navigation constraints. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NavigationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u32>,
    #[serde(default)]
    pub require_tags: Vec<String>,
    #[serde(default)]
    pub exclude_tags: Vec<String>,
    #[serde(default)]
    pub preferred_relations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
    /// `Some(true)` walks every link in both directions for this query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
}

/// Tuning for the hybrid strategy.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridParams {
    pub semantic_threshold: f32,
    pub max_exploratory_steps: u32,
    pub min_semantic_score: f32,
}

/// Request-level overrides on top of the engine's hybrid defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HybridOverrides {
    #[serde(default)]
    pub semantic_threshold: Option<f32>,
    #[serde(default)]
    pub max_exploratory_steps: Option<u32>,
    #[serde(default)]
    pub min_semantic_score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    #[serde(default)]
    pub start_id: String,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub mode: NavigationMode,
    #[serde(default)]
    pub strategy: NavigationOptions,
    #[serde(default)]
    pub include_content: bool,
    #[serde(default)]
    pub include_metadata: bool,
    #[serde(default)]
    pub format: NavigationFormat,
    #[serde(default)]
    pub hybrid: Option<HybridOverrides>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("startId must not be empty")]
    EmptyStartId,
    #[error("targetId must not be empty when provided")]
    EmptyTargetId,
    #[error("mode '{0}' requires targetId")]
    MissingTarget(NavigationMode),
    #[error("minStrength must be between 0 and 1")]
    InvalidMinStrength,
    #[error("minConfidence must be between 0 and 1")]
    InvalidMinConfidence,
    #[error("maxSteps must not exceed {0}")]
    InvalidMaxSteps(u32),
    #[error("requireTags must not contain empty values")]
    InvalidRequireTags,
    #[error("excludeTags must not contain empty values")]
    InvalidExcludeTags,
    #[error("preferredRelations must not contain empty values")]
    InvalidPreferredRelations,
    #[error("semanticThreshold must be a finite, non-negative number")]
    InvalidSemanticThreshold,
    #[error("minSemanticScore must be a finite, non-negative number")]
    InvalidMinSemanticScore,
    #[error("maxExploratorySteps must be between 1 and {0}")]
    InvalidMaxExploratorySteps(u32),
}

impl NavigationOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(min_strength) = self.min_strength {
            if !is_unit_interval(min_strength) {
                return Err(ValidationError::InvalidMinStrength);
            }
        }
        if let Some(min_confidence) = self.min_confidence {
            if !is_unit_interval(min_confidence) {
                return Err(ValidationError::InvalidMinConfidence);
            }
        }
        if self.max_steps.is_some_and(|steps| steps > MAX_STEPS) {
            return Err(ValidationError::InvalidMaxSteps(MAX_STEPS));
        }
        if has_empty_values(&self.require_tags) {
            return Err(ValidationError::InvalidRequireTags);
        }
        if has_empty_values(&self.exclude_tags) {
            return Err(ValidationError::InvalidExcludeTags);
        }
        if has_empty_values(&self.preferred_relations) {
            return Err(ValidationError::InvalidPreferredRelations);
        }
        Ok(())
    }

    pub fn is_preferred(&self, relation: &str) -> bool {
        self.preferred_relations.iter().any(|r| r == relation)
    }

    pub fn force_bidirectional(&self) -> bool {
        self.bidirectional.unwrap_or(false)
    }

    /// True when the context carries any excluded tag; such nodes are pruned.
    pub fn excludes(&self, context: &Context) -> bool {
        self.exclude_tags.iter().any(|tag| context.has_tag(tag))
    }

    /// True when the context carries every required tag. Required tags rank
    /// neighbors, they never block traversal.
    pub fn matches_required(&self, context: &Context) -> bool {
        !self.require_tags.is_empty() && self.require_tags.iter().all(|tag| context.has_tag(tag))
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

impl HybridParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_non_negative(self.semantic_threshold) {
            return Err(ValidationError::InvalidSemanticThreshold);
        }
        if !is_non_negative(self.min_semantic_score) {
            return Err(ValidationError::InvalidMinSemanticScore);
        }
        if self.max_exploratory_steps == 0 || self.max_exploratory_steps > MAX_STEPS {
            return Err(ValidationError::InvalidMaxExploratorySteps(MAX_STEPS));
        }
        Ok(())
    }
}

impl Default for HybridParams {
    fn default() -> Self {
        Self::from(&HybridConfig::default())
    }
}

impl From<&HybridConfig> for HybridParams {
    fn from(config: &HybridConfig) -> Self {
        Self {
            semantic_threshold: config.semantic_threshold,
            max_exploratory_steps: config.max_exploratory_steps,
            min_semantic_score: config.min_semantic_score,
        }
    }
}

impl HybridOverrides {
    pub fn apply(&self, base: &HybridParams) -> HybridParams {
        HybridParams {
            semantic_threshold: self.semantic_threshold.unwrap_or(base.semantic_threshold),
            max_exploratory_steps: self
                .max_exploratory_steps
                .unwrap_or(base.max_exploratory_steps),
            min_semantic_score: self.min_semantic_score.unwrap_or(base.min_semantic_score),
        }
    }
}

impl NavigationRequest {
    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_id.trim().is_empty() {
            return Err(ValidationError::EmptyStartId);
        }
        if let Some(target_id) = &self.target_id {
            if target_id.trim().is_empty() {
                return Err(ValidationError::EmptyTargetId);
            }
        }
        self.strategy.validate()
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.include_content, self.include_metadata)
    }
}

fn is_unit_interval(value: f32) -> bool {
    (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value)
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn has_empty_values(values: &[String]) -> bool {
    values.iter().any(|value| value.trim().is_empty())
}
