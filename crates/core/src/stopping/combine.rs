use std::ops::{BitAnd, BitOr};

use super::{Criterion, Group, GroupOp};

/// Combines two criteria into a flat `All` group.
///
/// If either side is already an `All` group, its children are spliced in
/// place, so chained combination yields one group in left-to-right order:
///
/// ```
/// use cadence_core::{Criterion, combine_all};
///
/// type C = Criterion<(), (), ()>;
///
/// let chained = combine_all(combine_all(C::after_iteration(1), C::after_iteration(2)), C::after_iteration(3));
/// assert_eq!(chained.as_group().map(|g| g.children().len()), Some(3));
/// ```
///
/// An `Any` group on either side is kept as a single nested child.
#[must_use]
pub fn combine_all<P, A, S>(a: Criterion<P, A, S>, b: Criterion<P, A, S>) -> Criterion<P, A, S> {
    combine(GroupOp::All, a, b)
}

/// Combines two criteria into a flat `Any` group.
///
/// Follows the same flattening rule as [`combine_all`], with `Any` in place
/// of `All`.
#[must_use]
pub fn combine_any<P, A, S>(a: Criterion<P, A, S>, b: Criterion<P, A, S>) -> Criterion<P, A, S> {
    combine(GroupOp::Any, a, b)
}

fn combine<P, A, S>(
    op: GroupOp,
    a: Criterion<P, A, S>,
    b: Criterion<P, A, S>,
) -> Criterion<P, A, S> {
    let mut children = splice(op, a);
    children.extend(splice(op, b));

    Criterion::Group(Group::combined(op, children))
}

/// Returns the children of a same-operator group, or the criterion itself.
fn splice<P, A, S>(op: GroupOp, criterion: Criterion<P, A, S>) -> Vec<Criterion<P, A, S>> {
    match criterion {
        Criterion::Group(group) if group.op() == op => group.into_children(),
        other => vec![other],
    }
}

impl<P, A, S> BitAnd for Criterion<P, A, S> {
    type Output = Self;

    /// Shorthand for [`combine_all`].
    fn bitand(self, rhs: Self) -> Self {
        combine_all(self, rhs)
    }
}

impl<P, A, S> BitOr for Criterion<P, A, S> {
    type Output = Self;

    /// Shorthand for [`combine_any`].
    fn bitor(self, rhs: Self) -> Self {
        combine_any(self, rhs)
    }
}
