use ctxnav_core::model::Link;
use std::collections::HashMap;
use tracing::debug;

/// One traversable step out of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop<'a> {
    /// Node the hop leaves.
    pub from: &'a str,
    pub neighbor: &'a str,
    /// Position of the link in the slice the graph was built from.
    pub link: usize,
    /// True when the link is walked from its target back to its source.
    pub reversed: bool,
}

/// Adjacency list over a borrowed link snapshot.
///
/// Hops are stored in link order, so iteration order is deterministic for a
/// fixed snapshot.
pub struct AdjacencyGraph<'a> {
    adjacency: HashMap<&'a str, Vec<Hop<'a>>>,
}

impl<'a> AdjacencyGraph<'a> {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    /// Build from every link. `force_bidirectional` makes each link walkable
    /// backwards regardless of its own flag.
    pub fn build(links: &'a [Link], force_bidirectional: bool) -> Self {
        Self::build_filtered(links, force_bidirectional, |_| true)
    }

    /// Build from the links accepted by `keep`; rejected links are absent
    /// from the graph in both directions.
    pub fn build_filtered<F>(links: &'a [Link], force_bidirectional: bool, keep: F) -> Self
    where
        F: Fn(&Link) -> bool,
    {
        let mut graph = Self::new();
        for (index, link) in links.iter().enumerate() {
            if keep(link) {
                graph.add_link(index, link, force_bidirectional || link.bidirectional);
            }
        }
        debug!(
            nodes = graph.node_count(),
            hops = graph.edge_count(),
            "adjacency graph built"
        );
        graph
    }

    pub fn add_link(&mut self, index: usize, link: &'a Link, both_ways: bool) {
        self.adjacency
            .entry(link.source_id.as_str())
            .or_default()
            .push(Hop {
                from: link.source_id.as_str(),
                neighbor: link.target_id.as_str(),
                link: index,
                reversed: false,
            });

        if both_ways {
            self.adjacency
                .entry(link.target_id.as_str())
                .or_default()
                .push(Hop {
                    from: link.target_id.as_str(),
                    neighbor: link.source_id.as_str(),
                    link: index,
                    reversed: true,
                });
        }
    }

    /// Hops leaving `id`, in link order.
    pub fn neighbors(&self, id: &str) -> &[Hop<'a>] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|v| v.len()).sum()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

impl Default for AdjacencyGraph<'_> {
    fn default() -> Self {
        Self::new()
    }
}
