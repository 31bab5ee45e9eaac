//! Approximate matching of a search term against known package names.
//!
//! Every candidate gets a distance from a pluggable [`Distance`]; results are
//! stably sorted nearest first, so equal distances keep input order. A
//! candidate equal to the query (case-sensitive) short-circuits to a single
//! result.

/// Dissimilarity between a query and a candidate; 0 means identical.
pub trait Distance {
    fn distance(&self, query: &str, candidate: &str) -> usize;
}

impl<F> Distance for F
where
    F: Fn(&str, &str) -> usize,
{
    fn distance(&self, query: &str, candidate: &str) -> usize {
        self(query, candidate)
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Case-folded Damerau-Levenshtein distance: insertions, deletions,
/// substitutions and adjacent transpositions all cost one.
pub struct FoldDistance;

impl Distance for FoldDistance {
    fn distance(&self, query: &str, candidate: &str) -> usize {
        strsim::damerau_levenshtein(&query.to_lowercase(), &candidate.to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub target: String,
    /// Position of `target` in the ranked `names` slice.
    pub original_index: usize,
    pub distance: usize,
}

impl Match {
    pub fn is_exact(&self, query: &str) -> bool {
        self.target == query
    }
}

/// Rank `names` against `query` with [`FoldDistance`].
pub fn rank(query: &str, names: &[String]) -> Vec<Match> {
    rank_with(query, names, &FoldDistance)
}

/// Rank `names` against `query` with a caller-chosen distance.
pub fn rank_with(query: &str, names: &[String], distance: &dyn Distance) -> Vec<Match> {
    let mut matches: Vec<Match> = names
        .iter()
        .enumerate()
        .map(|(original_index, name)| Match {
            target: name.clone(),
            original_index,
            distance: distance.distance(query, name),
        })
        .collect();
    matches.sort_by_key(|m| m.distance);

    if let Some(pos) = matches.iter().position(|m| m.is_exact(query)) {
        let exact = matches.swap_remove(pos);
        return vec![exact];
    }
    matches
}
