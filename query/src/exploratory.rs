use crate::dsl::{NavigationFormat, NavigationOptions};
use crate::error::NavigationError;
use crate::projector::RawSubgraph;
use crate::scope::QueryScope;
use crate::score::score;
use ctxnav_core::model::{Context, Link};
use std::collections::{HashSet, VecDeque};
use storage::index::{AdjacencyGraph, Hop};
use tracing::warn;

struct Candidate<'g, 'l> {
    hop: &'g Hop<'l>,
    score: f32,
    /// Resolved only for neighbors not yet visited.
    context: Option<Context>,
}

impl Candidate<'_, '_> {
    fn rank(&self, options: &NavigationOptions) -> bool {
        self.context
            .as_ref()
            .is_some_and(|context| options.matches_required(context))
    }
}

/// Breadth-first expansion from `start`.
///
/// Neighbors carrying every required tag are visited first, then by
/// descending score. Neighbors with an excluded tag are pruned together with
/// everything only reachable through them. Nodes at `max_steps` depth stay in
/// the result but are not expanded. In graph format, links between two
/// already included nodes are kept once; tree format keeps only the edge that
/// first reached each node.
pub(crate) async fn traverse<'l>(
    scope: &mut QueryScope<'_>,
    links: &'l [Link],
    start: Context,
    options: &NavigationOptions,
    format: NavigationFormat,
) -> Result<RawSubgraph<'l>, NavigationError> {
    let graph = AdjacencyGraph::build(links, options.force_bidirectional());
    let start_id = start.id.clone();

    let mut visited: HashSet<&str> = HashSet::from([start_id.as_str()]);
    let mut included_links: HashSet<usize> = HashSet::new();
    let mut nodes = vec![start];
    // (link index, reached a new node)
    let mut edges: Vec<(usize, bool)> = Vec::new();
    let mut frontier = VecDeque::from([(start_id.as_str(), 0_u32)]);

    while let Some((node, depth)) = frontier.pop_front() {
        if options.max_steps.is_some_and(|max| depth >= max) {
            continue;
        }

        let mut candidates = Vec::new();
        for hop in graph.neighbors(node) {
            let score = score(&links[hop.link], options);
            if score <= 0.0 {
                continue;
            }
            if visited.contains(hop.neighbor) {
                candidates.push(Candidate { hop, score, context: None });
                continue;
            }
            match scope.context(hop.neighbor).await? {
                Some(context) if options.excludes(&context) => {}
                Some(context) => candidates.push(Candidate {
                    hop,
                    score,
                    context: Some(context),
                }),
                None => warn!(
                    link_id = %links[hop.link].id,
                    context_id = hop.neighbor,
                    "skipping neighbor missing from context store"
                ),
            }
        }
        candidates.sort_by(|a, b| {
            b.rank(options)
                .cmp(&a.rank(options))
                .then_with(|| b.score.total_cmp(&a.score))
        });

        for Candidate { hop, context, .. } in candidates {
            match context {
                Some(context) if visited.insert(hop.neighbor) => {
                    included_links.insert(hop.link);
                    nodes.push(context);
                    edges.push((hop.link, true));
                    frontier.push_back((hop.neighbor, depth + 1));
                }
                _ => {
                    if included_links.insert(hop.link) {
                        edges.push((hop.link, false));
                    }
                }
            }
        }
    }

    let edges = edges
        .into_iter()
        .filter(|&(_, tree)| tree || format == NavigationFormat::Graph)
        .map(|(index, _)| &links[index])
        .collect();

    Ok(RawSubgraph { nodes, edges })
}
