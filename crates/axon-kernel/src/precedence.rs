//! Binding precedence comparator
//!
//! Total order over candidate bindings for the same requested service,
//! evaluated as an ordered table of boolean predicates. The first predicate
//! on which two bindings disagree decides the order, with the true side
//! winning; agreement on every predicate is a tie, which the resolution
//! engine treats as ambiguity under a unique request.
//!
//! Predicate order, highest priority first:
//! 1. present binding over an absent one (malformed resolver output),
//! 2. conditional over unconditional,
//! 3. fully closed target over an open one,
//! 4. explicit over implicit.

use std::cmp::Ordering;
use std::sync::Arc;

use axon_domain::Binding;

/// Attribute predicates in priority order; true-side outranks false-side
const PREDICATES: &[fn(&Binding) -> bool] = &[
    |binding| binding.is_conditional(),
    |binding| !binding.is_open_target(),
    |binding| !binding.is_implicit(),
];

/// Compare two candidate bindings.
///
/// `Greater` means `a` outranks `b`. Absent bindings rank below every
/// present one.
pub fn compare(a: Option<&Binding>, b: Option<&Binding>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(a), Some(b)) => compare_attributes(a, b),
    }
}

fn compare_attributes(a: &Binding, b: &Binding) -> Ordering {
    for predicate in PREDICATES {
        match (predicate(a), predicate(b)) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Whether two bindings are resolution-ambiguous (equal precedence)
pub fn tied(a: &Binding, b: &Binding) -> bool {
    compare_attributes(a, b) == Ordering::Equal
}

/// Sort candidates highest-precedence first.
///
/// The sort is stable, so registration order is preserved among tied
/// candidates.
pub fn sort_descending(bindings: &mut [Arc<Binding>]) {
    bindings.sort_by(|a, b| compare_attributes(b, a));
}
