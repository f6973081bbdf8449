use std::{fmt, sync::Arc, time::Duration};

use thiserror::Error;

use super::StoppingRule;

/// An immutable rule, or combination of rules, describing when to stop.
///
/// The type parameters are the problem `P`, algorithm `A`, and state `S` that
/// [`StoppingRule`] leaves inspect. Criteria that contain no rule leaves work
/// with any `P`, `A`, and `S`.
pub enum Criterion<P, A, S> {
    /// A single condition.
    Leaf(Leaf<P, A, S>),

    /// A non-empty `All` or `Any` combination of criteria.
    Group(Group<P, A, S>),
}

/// A single stopping condition.
pub enum Leaf<P, A, S> {
    /// Stop once the iteration reaches `max_iterations`.
    AfterIteration { max_iterations: usize },

    /// Stop once `threshold` of wall-clock time has elapsed since iteration 0.
    AfterDuration { threshold: Duration },

    /// Stop while a custom rule is met.
    Rule(Arc<dyn StoppingRule<P, A, S> + Send + Sync>),
}

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOp {
    /// Stop when every child indicates to stop.
    All,

    /// Stop when at least one child indicates to stop.
    Any,
}

/// A group of one or more child criteria.
pub struct Group<P, A, S> {
    op: GroupOp,
    children: Vec<Criterion<P, A, S>>,
}

/// Errors that can occur when constructing a criterion.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CriterionError {
    #[error("a {0:?} group needs at least one child criterion")]
    EmptyGroup(GroupOp),
}

impl<P, A, S> Criterion<P, A, S> {
    /// Stops once the iteration counter reaches `max_iterations`.
    #[must_use]
    pub fn after_iteration(max_iterations: usize) -> Self {
        Self::Leaf(Leaf::AfterIteration { max_iterations })
    }

    /// Stops once `threshold` has elapsed since the run's first evaluation.
    #[must_use]
    pub fn after_duration(threshold: Duration) -> Self {
        Self::Leaf(Leaf::AfterDuration { threshold })
    }

    /// Stops while `rule` is met.
    #[must_use]
    pub fn rule<R>(rule: R) -> Self
    where
        R: StoppingRule<P, A, S> + Send + Sync + 'static,
    {
        Self::Leaf(Leaf::Rule(Arc::new(rule)))
    }

    /// Creates an `All` group from the given children, without flattening.
    ///
    /// # Errors
    ///
    /// Returns [`CriterionError::EmptyGroup`] if `children` is empty.
    pub fn all(children: Vec<Self>) -> Result<Self, CriterionError> {
        Group::new(GroupOp::All, children).map(Self::Group)
    }

    /// Creates an `Any` group from the given children, without flattening.
    ///
    /// # Errors
    ///
    /// Returns [`CriterionError::EmptyGroup`] if `children` is empty.
    pub fn any(children: Vec<Self>) -> Result<Self, CriterionError> {
        Group::new(GroupOp::Any, children).map(Self::Group)
    }

    /// Returns the group if this criterion is one.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group<P, A, S>> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }
}

impl<P, A, S> Group<P, A, S> {
    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns [`CriterionError::EmptyGroup`] if `children` is empty.
    pub fn new(op: GroupOp, children: Vec<Criterion<P, A, S>>) -> Result<Self, CriterionError> {
        if children.is_empty() {
            return Err(CriterionError::EmptyGroup(op));
        }
        Ok(Self { op, children })
    }

    /// Returns how this group combines its children.
    #[must_use]
    pub fn op(&self) -> GroupOp {
        self.op
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[Criterion<P, A, S>] {
        &self.children
    }

    /// Builds a group from the spliced children of a combination, which
    /// always holds at least two criteria.
    pub(super) fn combined(op: GroupOp, children: Vec<Criterion<P, A, S>>) -> Self {
        debug_assert!(children.len() >= 2);
        Self { op, children }
    }

    pub(super) fn into_children(self) -> Vec<Criterion<P, A, S>> {
        self.children
    }
}

impl<P, A, S> Clone for Criterion<P, A, S> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
            Self::Group(group) => Self::Group(group.clone()),
        }
    }
}

impl<P, A, S> Clone for Leaf<P, A, S> {
    fn clone(&self) -> Self {
        match self {
            Self::AfterIteration { max_iterations } => Self::AfterIteration {
                max_iterations: *max_iterations,
            },
            Self::AfterDuration { threshold } => Self::AfterDuration {
                threshold: *threshold,
            },
            Self::Rule(rule) => Self::Rule(Arc::clone(rule)),
        }
    }
}

impl<P, A, S> Clone for Group<P, A, S> {
    fn clone(&self) -> Self {
        Self {
            op: self.op,
            children: self.children.clone(),
        }
    }
}

/// Rule leaves compare by identity: two leaves are equal if they share a rule.
impl<P, A, S> PartialEq for Leaf<P, A, S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::AfterIteration { max_iterations: a },
                Self::AfterIteration { max_iterations: b },
            ) => a == b,
            (Self::AfterDuration { threshold: a }, Self::AfterDuration { threshold: b }) => a == b,
            (Self::Rule(a), Self::Rule(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }
}

impl<P, A, S> PartialEq for Group<P, A, S> {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op && self.children == other.children
    }
}

impl<P, A, S> PartialEq for Criterion<P, A, S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a == b,
            (Self::Group(a), Self::Group(b)) => a == b,
            _ => false,
        }
    }
}

impl<P, A, S> fmt::Debug for Criterion<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => f.debug_tuple("Leaf").field(leaf).finish(),
            Self::Group(group) => f.debug_tuple("Group").field(group).finish(),
        }
    }
}

impl<P, A, S> fmt::Debug for Leaf<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AfterIteration { max_iterations } => f
                .debug_struct("AfterIteration")
                .field("max_iterations", max_iterations)
                .finish(),
            Self::AfterDuration { threshold } => f
                .debug_struct("AfterDuration")
                .field("threshold", threshold)
                .finish(),
            Self::Rule(rule) => f.debug_tuple("Rule").field(&rule.describe()).finish(),
        }
    }
}

impl<P, A, S> fmt::Debug for Group<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("op", &self.op)
            .field("children", &self.children)
            .finish()
    }
}
