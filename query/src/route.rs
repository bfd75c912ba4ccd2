use crate::error::NavigationError;
use crate::projector::RawSubgraph;
use crate::scope::QueryScope;
use ctxnav_core::model::{Context, Link};
use std::collections::HashMap;
use storage::index::Hop;

/// The hop that first reached each node.
pub(crate) type Parents<'a> = HashMap<&'a str, Hop<'a>>;

/// Walk predecessor hops back from `target`, returning the route from
/// `start` in walk order.
pub(crate) fn unwind<'a>(parents: &Parents<'a>, start: &str, target: &str) -> Vec<Hop<'a>> {
    let mut steps = Vec::new();
    let mut current = target;
    while current != start {
        match parents.get(current) {
            Some(&hop) => {
                steps.push(hop);
                current = hop.from;
            }
            None => break,
        }
    }
    steps.reverse();
    steps
}

/// Resolve every node of a route. A node the store cannot resolve is a
/// dangling link, reported with the link that led to it.
pub(crate) async fn materialize<'l>(
    scope: &mut QueryScope<'_>,
    links: &'l [Link],
    start: Context,
    steps: &[Hop<'_>],
) -> Result<RawSubgraph<'l>, NavigationError> {
    let mut raw = RawSubgraph {
        nodes: Vec::with_capacity(steps.len() + 1),
        edges: Vec::with_capacity(steps.len()),
    };
    raw.nodes.push(start);

    for hop in steps {
        let link = &links[hop.link];
        let context = scope
            .context(hop.neighbor)
            .await?
            .ok_or_else(|| NavigationError::DanglingLink {
                link_id: link.id.clone(),
                context_id: hop.neighbor.to_string(),
            })?;
        raw.nodes.push(context);
        raw.edges.push(link);
    }

    Ok(raw)
}
