use crate::dsl::{HybridParams, NavigationFormat, NavigationOptions};
use crate::error::NavigationError;
use crate::exploratory;
use crate::projector::RawSubgraph;
use crate::scope::QueryScope;
use crate::score::{hybrid_score, mean_hybrid_score};
use crate::weighted;
use ctxnav_core::model::{Context, Link};
use tracing::{debug, warn};

pub(crate) struct HybridOutcome<'l> {
    pub subgraph: RawSubgraph<'l>,
    pub fallback: bool,
    pub target_reached: bool,
}

/// Weighted path when its mean hybrid score is good enough, otherwise a
/// filtered exploratory subgraph around `start`.
///
/// Errors from the weighted search are propagated, never replaced by the
/// fallback.
pub(crate) async fn find<'l>(
    scope: &mut QueryScope<'_>,
    links: &'l [Link],
    start: Context,
    target: &str,
    options: &NavigationOptions,
    params: &HybridParams,
) -> Result<HybridOutcome<'l>, NavigationError> {
    if let Some(path) = weighted::find(scope, links, start.clone(), target, options).await? {
        match mean_hybrid_score(path.edges.iter().copied(), options) {
            None => return Ok(accepted(path)),
            Some(mean) if mean >= params.min_semantic_score => {
                debug!(mean, "weighted path accepted");
                return Ok(accepted(path));
            }
            Some(mean) => debug!(
                mean,
                min_semantic_score = params.min_semantic_score,
                "weighted path below semantic score, falling back"
            ),
        }
    } else {
        debug!(target_id = target, "no weighted path, falling back to exploration");
    }

    let fallback_options = options
        .clone()
        .with_max_steps(params.max_exploratory_steps);
    let mut subgraph = exploratory::traverse(
        scope,
        links,
        start,
        &fallback_options,
        NavigationFormat::Graph,
    )
    .await?;
    subgraph
        .edges
        .retain(|link| hybrid_score(link, options) >= params.semantic_threshold);

    let target_reached = subgraph.nodes.iter().any(|context| context.id == target);
    if !target_reached {
        warn!(
            target_id = target,
            nodes = subgraph.nodes.len(),
            "hybrid fallback subgraph does not contain the target"
        );
    }

    Ok(HybridOutcome {
        subgraph,
        fallback: true,
        target_reached,
    })
}

fn accepted(path: RawSubgraph<'_>) -> HybridOutcome<'_> {
    HybridOutcome {
        subgraph: path,
        fallback: false,
        target_reached: true,
    }
}
