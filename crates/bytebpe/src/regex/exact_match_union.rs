//! Exact Match Union Patterns

use crate::errors::Result;
use fancy_regex::Regex;

/// Create a union pattern of exact matches.
///
/// Longer alternatives are listed first, so that when one special token is a
/// prefix of another the longer one wins.
pub fn exact_match_union_regex_pattern<S: AsRef<str>>(alts: &[S]) -> String {
    let mut alts = alts.iter().map(|s| s.as_ref()).collect::<Vec<_>>();
    alts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let parts = alts
        .into_iter()
        .map(fancy_regex::escape)
        .collect::<Vec<_>>();
    format!("({})", parts.join("|"))
}

/// Create a union pattern of exact matches, compiled into a [`Regex`].
///
/// See: [`exact_match_union_regex_pattern`]
pub fn exact_match_union_regex<S: AsRef<str>>(alts: &[S]) -> Result<Regex> {
    Ok(Regex::new(&exact_match_union_regex_pattern(alts))?)
}
