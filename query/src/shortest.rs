use crate::dsl::NavigationOptions;
use crate::error::NavigationError;
use crate::projector::RawSubgraph;
use crate::route::{materialize, unwind, Parents};
use crate::scope::QueryScope;
use ctxnav_core::model::{Context, Link};
use std::collections::{HashSet, VecDeque};
use storage::index::{AdjacencyGraph, Hop};

/// Minimum-hop path from `start` to `target` by breadth-first search.
///
/// Link scores are not consulted. Returns `None` when the target is not
/// reachable over the given links.
pub(crate) async fn find<'l>(
    scope: &mut QueryScope<'_>,
    links: &'l [Link],
    start: Context,
    target: &str,
    options: &NavigationOptions,
) -> Result<Option<RawSubgraph<'l>>, NavigationError> {
    if start.id == target {
        return Ok(Some(RawSubgraph {
            nodes: vec![start],
            edges: Vec::new(),
        }));
    }

    let graph = AdjacencyGraph::build(links, options.force_bidirectional());
    let Some(steps) = search(&graph, &start.id, target) else {
        return Ok(None);
    };

    materialize(scope, links, start, &steps).await.map(Some)
}

fn search<'l>(graph: &AdjacencyGraph<'l>, start: &str, target: &str) -> Option<Vec<Hop<'l>>> {
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut parents = Parents::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        if node == target {
            return Some(unwind(&parents, start, target));
        }
        for hop in graph.neighbors(node) {
            if visited.insert(hop.neighbor) {
                parents.insert(hop.neighbor, *hop);
                queue.push_back(hop.neighbor);
            }
        }
    }

    None
}
