//! Selection reconciliation
//!
//! The multi-select reports its whole new value on every change, never the
//! delta. [`reconcile`] recovers the single change by diffing against the
//! previous selection.

use std::collections::HashSet;

/// State change implied by a selection update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Enable(String),
    Disable(String),
    NoOp,
}

/// Diff `previous` against `new`.
///
/// Precondition: at most one item changed. Additions win over removals, and
/// of several additions (or removals) only the first, in the order the
/// caller supplied, is returned. The rest are ignored.
pub fn reconcile<P, N>(previous: &[P], new: &[N]) -> Action
where
    P: AsRef<str>,
    N: AsRef<str>,
{
    if let Some(added) = first_missing(new, previous) {
        return Action::Enable(added.to_string());
    }

    match first_missing(previous, new) {
        Some(removed) => Action::Disable(removed.to_string()),
        None => Action::NoOp,
    }
}

/// First element of `from` not present in `other`.
fn first_missing<'a, A, B>(from: &'a [A], other: &[B]) -> Option<&'a str>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let other: HashSet<&str> = other.iter().map(AsRef::as_ref).collect();
    from.iter()
        .map(AsRef::as_ref)
        .find(|symbol| !other.contains(symbol))
}
