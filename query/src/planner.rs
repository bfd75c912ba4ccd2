use crate::dsl::{
    HybridParams, NavigationFormat, NavigationMode, NavigationRequest, ValidationError,
};
use ctxnav_core::metrics::QueryKind;

/// A validated request resolved to exactly one algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationStrategy {
    Unweighted { target: String },
    Weighted { target: String },
    Exploratory { format: NavigationFormat },
    Hybrid { target: String, params: HybridParams },
}

impl NavigationStrategy {
    pub fn kind(&self) -> QueryKind {
        match self {
            NavigationStrategy::Unweighted { .. } => QueryKind::Unweighted,
            NavigationStrategy::Weighted { .. } => QueryKind::Weighted,
            NavigationStrategy::Exploratory { .. } => QueryKind::Exploratory,
            NavigationStrategy::Hybrid { .. } => QueryKind::Hybrid,
        }
    }
}

pub struct NavigationPlanner;

impl NavigationPlanner {
    /// `hybrid_defaults` are the engine's configured parameters; request
    /// overrides are merged over them and validated.
    pub fn plan(
        request: &NavigationRequest,
        hybrid_defaults: &HybridParams,
    ) -> Result<NavigationStrategy, ValidationError> {
        request.validate()?;

        let target = || {
            request
                .target_id
                .clone()
                .ok_or(ValidationError::MissingTarget(request.mode))
        };

        let strategy = match request.mode {
            NavigationMode::Shortest => NavigationStrategy::Unweighted { target: target()? },
            NavigationMode::Weighted => NavigationStrategy::Weighted { target: target()? },
            NavigationMode::Exploratory => NavigationStrategy::Exploratory {
                format: request.format,
            },
            NavigationMode::Hybrid => {
                let params = request
                    .hybrid
                    .map(|overrides| overrides.apply(hybrid_defaults))
                    .unwrap_or(*hybrid_defaults);
                params.validate()?;
                NavigationStrategy::Hybrid {
                    target: target()?,
                    params,
                }
            }
        };

        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> NavigationRequest {
        NavigationRequest::parse_json(raw).unwrap()
    }

    #[test]
    fn default_mode_plans_weighted() {
        let plan = NavigationPlanner::plan(
            &request(r#"{"startId":"a","targetId":"b"}"#),
            &HybridParams::default(),
        )
        .unwrap();
        assert_eq!(
            plan,
            NavigationStrategy::Weighted {
                target: "b".to_string()
            }
        );
        assert_eq!(plan.kind(), QueryKind::Weighted);
    }

    #[test]
    fn point_to_point_modes_require_target() {
        for mode in ["shortest", "weighted", "hybrid"] {
            let raw = format!(r#"{{"startId":"a","mode":"{mode}"}}"#);
            let err = NavigationPlanner::plan(&request(&raw), &HybridParams::default())
                .unwrap_err();
            assert_eq!(err.to_string(), format!("mode '{mode}' requires targetId"));
        }
    }

    #[test]
    fn exploratory_needs_no_target_and_keeps_format() {
        let plan = NavigationPlanner::plan(
            &request(r#"{"startId":"a","mode":"exploratory","format":"tree"}"#),
            &HybridParams::default(),
        )
        .unwrap();
        assert_eq!(
            plan,
            NavigationStrategy::Exploratory {
                format: NavigationFormat::Tree
            }
        );
    }

    #[test]
    fn hybrid_merges_and_validates_overrides() {
        let defaults = HybridParams::default();
        let plan = NavigationPlanner::plan(
            &request(
                r#"{"startId":"a","targetId":"b","mode":"hybrid","hybrid":{"maxExploratorySteps":5}}"#,
            ),
            &defaults,
        )
        .unwrap();
        match plan {
            NavigationStrategy::Hybrid { params, .. } => {
                assert_eq!(params.max_exploratory_steps, 5);
                assert_eq!(params.min_semantic_score, defaults.min_semantic_score);
            }
            other => panic!("unexpected plan {other:?}"),
        }

        let err = NavigationPlanner::plan(
            &request(
                r#"{"startId":"a","targetId":"b","mode":"hybrid","hybrid":{"semanticThreshold":-1}}"#,
            ),
            &defaults,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidSemanticThreshold);
    }

    #[test]
    fn invalid_options_are_rejected_before_planning() {
        let err = NavigationPlanner::plan(
            &request(r#"{"startId":"  ","targetId":"b"}"#),
            &HybridParams::default(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyStartId);
    }
}
