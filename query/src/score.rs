use crate::dsl::NavigationOptions;
use ctxnav_core::model::Link;

pub const PREFERRED_RELATION_BOOST: f32 = 1.5;
pub const USER_PROVENANCE_BOOST: f32 = 1.2;
pub const TOOL_PROVENANCE_PENALTY: f32 = 0.8;

/// Relevance of a link for path finding and exploration.
///
/// Starts at 1.0 and is multiplied by the preferred-relation boost, the
/// strength and the confidence when present. A present value under its
/// minimum forces the score to zero, which means the link must not extend a
/// path.
pub fn score(link: &Link, options: &NavigationOptions) -> f32 {
    if fails_thresholds(link, options) {
        return 0.0;
    }

    let mut score = 1.0_f32;
    if options.is_preferred(&link.relation) {
        score *= PREFERRED_RELATION_BOOST;
    }
    if let Some(strength) = link.strength {
        score *= strength;
    }
    if let Some(confidence) = link.confidence() {
        score *= confidence;
    }
    score
}

/// True when a present strength or confidence is outside `[0, 1]` or below
/// the query minimum. Absent values never fail a threshold.
pub fn fails_thresholds(link: &Link, options: &NavigationOptions) -> bool {
    let fails = |value: Option<f32>, min: Option<f32>| match value {
        Some(value) if !is_unit(value) => true,
        Some(value) => min.is_some_and(|min| value < min),
        None => false,
    };
    fails(link.strength, options.min_strength) || fails(link.confidence(), options.min_confidence)
}

fn is_unit(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Hard pre-pass run before any graph is built.
pub fn filter_links(links: &[Link], options: &NavigationOptions) -> Vec<Link> {
    links
        .iter()
        .filter(|link| !fails_thresholds(link, options))
        .cloned()
        .collect()
}

/// Score used only by the hybrid strategy to judge path quality.
///
/// Missing strength or confidence count as zero here, unlike [`score`].
pub fn hybrid_score(link: &Link, options: &NavigationOptions) -> f32 {
    if fails_thresholds(link, &NavigationOptions::default()) {
        return 0.0;
    }
    let mut score = link.strength.unwrap_or(0.0) * link.confidence().unwrap_or(0.0);
    if options.is_preferred(&link.relation) {
        score *= PREFERRED_RELATION_BOOST;
    }
    match link.provenance() {
        Some("user") => score *= USER_PROVENANCE_BOOST,
        Some("tool") => score *= TOOL_PROVENANCE_PENALTY,
        _ => {}
    }
    score
}

/// Arithmetic mean of [`hybrid_score`]; `None` for an empty edge list.
pub fn mean_hybrid_score<'a, I>(links: I, options: &NavigationOptions) -> Option<f32>
where
    I: IntoIterator<Item = &'a Link>,
{
    let (sum, count) = links
        .into_iter()
        .fold((0.0_f32, 0_usize), |(sum, count), link| {
            (sum + hybrid_score(link, options), count + 1)
        });
    (count > 0).then(|| sum / count as f32)
}
