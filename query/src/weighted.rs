use crate::dsl::NavigationOptions;
use crate::error::NavigationError;
use crate::projector::RawSubgraph;
use crate::route::{materialize, unwind, Parents};
use crate::scope::QueryScope;
use crate::score::score;
use ctxnav_core::model::{Context, Link};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use storage::index::{AdjacencyGraph, Hop};

struct Frontier<'a> {
    distance: f64,
    /// Push order; breaks distance ties in favour of the earlier entry.
    seq: u64,
    node: &'a str,
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on (distance, seq)
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Most relevant path from `start` to `target`: Dijkstra over edge weights
/// `1 / score`, with zero-score links left out of the graph.
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

    let weights: Vec<f32> = links.iter().map(|link| score(link, options)).collect();
    let graph = AdjacencyGraph::build_filtered(links, options.force_bidirectional(), |link| {
        score(link, options) > 0.0
    });

    let Some(steps) = search(&graph, &weights, &start.id, target) else {
        return Ok(None);
    };

    materialize(scope, links, start, &steps).await.map(Some)
}

fn search<'l>(
    graph: &AdjacencyGraph<'l>,
    scores: &[f32],
    start: &str,
    target: &str,
) -> Option<Vec<Hop<'l>>> {
    let mut distances: HashMap<&str, f64> = HashMap::from([(start, 0.0)]);
    let mut parents = Parents::new();
    let mut finalized: HashSet<&str> = HashSet::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0_u64;

    heap.push(Frontier {
        distance: 0.0,
        seq,
        node: start,
    });

    while let Some(Frontier { distance, node, .. }) = heap.pop() {
        if !finalized.insert(node) {
            continue;
        }
        if node == target {
            return Some(unwind(&parents, start, target));
        }

        for hop in graph.neighbors(node) {
            if finalized.contains(hop.neighbor) {
                continue;
            }
            let candidate = distance + 1.0 / f64::from(scores[hop.link]);
            let improved = distances
                .get(hop.neighbor)
                .map_or(true, |&known| candidate < known);
            if improved {
                distances.insert(hop.neighbor, candidate);
                parents.insert(hop.neighbor, *hop);
                seq += 1;
                heap.push(Frontier {
                    distance: candidate,
                    seq,
                    node: hop.neighbor,
                });
            }
        }
    }

    None
}
