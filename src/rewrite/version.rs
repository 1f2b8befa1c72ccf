//! Difficulty-name normalisation.
//!
//! Guest difficulties are conventionally named after their mapper
//! (`Alice's Insane`, `Chris' Hard`). When the set is re-attributed that
//! possessive prefix is stripped. The heuristic knows nothing about the actual
//! mapper name, so a difficulty literally called `Devil's Advocate` comes out
//! as `Advocate`.

/// Strip a possessive mapper prefix from a difficulty name.
///
/// Returns `None` when the value has no apostrophe, meaning the `Version:`
/// line must be left untouched.
pub fn strip_possessive(value: &str) -> Option<&str> {
    let value = value.trim();
    let apostrophe = value.find('\'')?;
    let rest = &value[apostrophe + 1..];

    let name = rest.strip_prefix('s').unwrap_or(rest);
    Some(name.trim())
}
