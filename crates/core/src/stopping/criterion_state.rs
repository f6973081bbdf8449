use std::{
    fmt,
    time::{Duration, Instant},
};

use thiserror::Error;

use super::{Criterion, Leaf};

/// Mutable bookkeeping that mirrors a [`Criterion`] node for node.
///
/// The tree is built once per run by [`CriterionState::new`]; afterwards only
/// leaf fields change. A group holds no status of its own: whether it has
/// stopped is derived from its children and its criterion's operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriterionState {
    /// Backs [`Leaf::AfterIteration`] and [`Leaf::Rule`].
    Marker(MarkerState),

    /// Backs [`Leaf::AfterDuration`].
    Duration(DurationState),

    /// Backs a group, one child state per child criterion.
    Group(GroupState),
}

/// Records the iteration at which a leaf indicated to stop.
///
/// `None` means the leaf has not triggered; `Some(0)` means it triggered
/// before the first step ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerState {
    pub(super) at_iteration: Option<usize>,
}

/// Bookkeeping for a wall-clock budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationState {
    pub(super) start: Option<Instant>,
    pub(super) elapsed: Duration,
    pub(super) at_iteration: Option<usize>,
}

/// Child states of a group, in the same order as the group's children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupState {
    pub(super) children: Vec<CriterionState>,
}

impl Default for CriterionState {
    fn default() -> Self {
        Self::Marker(MarkerState::default())
    }
}

impl CriterionState {
    /// Builds a fresh state tree shaped like `criterion`.
    #[must_use]
    pub fn new<P, A, S>(criterion: &Criterion<P, A, S>) -> Self {
        match criterion {
            Criterion::Leaf(Leaf::AfterIteration { .. } | Leaf::Rule(_)) => {
                Self::Marker(MarkerState::default())
            }
            Criterion::Leaf(Leaf::AfterDuration { .. }) => Self::Duration(DurationState::default()),
            Criterion::Group(group) => Self::Group(GroupState {
                children: group.children().iter().map(Self::new).collect(),
            }),
        }
    }

    /// Returns the iteration this leaf triggered at, or `None` for groups and
    /// leaves that have not triggered.
    #[must_use]
    pub fn at_iteration(&self) -> Option<usize> {
        match self {
            Self::Marker(marker) => marker.at_iteration,
            Self::Duration(duration) => duration.at_iteration,
            Self::Group(_) => None,
        }
    }

    /// Returns the child states of a group, or an empty slice for leaves.
    #[must_use]
    pub fn children(&self) -> &[CriterionState] {
        match self {
            Self::Group(group) => &group.children,
            Self::Marker(_) | Self::Duration(_) => &[],
        }
    }

    /// Clears every leaf in place, keeping the tree's shape and allocations.
    pub fn reset(&mut self) {
        match self {
            Self::Marker(marker) => *marker = MarkerState::default(),
            Self::Duration(duration) => *duration = DurationState::default(),
            Self::Group(group) => group.children.iter_mut().for_each(Self::reset),
        }
    }

    /// Returns the shape of this node.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Marker(_) => Shape::Marker,
            Self::Duration(_) => Shape::Duration,
            Self::Group(group) => Shape::Group(group.children.len()),
        }
    }

    /// Checks that this tree has exactly the shape `criterion` requires.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] describing the first node, in depth-first
    /// order, whose shape differs.
    pub fn check_shape<P, A, S>(
        &self,
        criterion: &Criterion<P, A, S>,
    ) -> Result<(), StructureError> {
        let mut path = Vec::new();
        self.check_shape_at(criterion, &mut path)
    }

    fn check_shape_at<P, A, S>(
        &self,
        criterion: &Criterion<P, A, S>,
        path: &mut Vec<usize>,
    ) -> Result<(), StructureError> {
        let expected = Shape::of(criterion);
        let found = self.shape();
        if expected != found {
            return Err(StructureError {
                path: path.clone(),
                expected,
                found,
            });
        }

        if let (Criterion::Group(group), Self::Group(state)) = (criterion, self) {
            for (index, (child, child_state)) in
                group.children().iter().zip(&state.children).enumerate()
            {
                path.push(index);
                child_state.check_shape_at(child, path)?;
                path.pop();
            }
        }

        Ok(())
    }
}

impl MarkerState {
    #[must_use]
    pub fn at_iteration(&self) -> Option<usize> {
        self.at_iteration
    }
}

impl DurationState {
    /// Returns when the run's first evaluation happened, if it has.
    #[must_use]
    pub fn start(&self) -> Option<Instant> {
        self.start
    }

    /// Returns the time elapsed as of the last evaluation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn at_iteration(&self) -> Option<usize> {
        self.at_iteration
    }
}

impl GroupState {
    #[must_use]
    pub fn children(&self) -> &[CriterionState] {
        &self.children
    }
}

/// The shape of a single criterion-state node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Marker,
    Duration,
    /// A group with the given number of children.
    Group(usize),
}

impl Shape {
    /// Returns the state shape a criterion node requires.
    pub(super) fn of<P, A, S>(criterion: &Criterion<P, A, S>) -> Self {
        match criterion {
            Criterion::Leaf(Leaf::AfterIteration { .. } | Leaf::Rule(_)) => Self::Marker,
            Criterion::Leaf(Leaf::AfterDuration { .. }) => Self::Duration,
            Criterion::Group(group) => Self::Group(group.children().len()),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker => write!(f, "marker"),
            Self::Duration => write!(f, "duration"),
            Self::Group(len) => write!(f, "group of {len}"),
        }
    }
}

/// A criterion state whose shape diverges from its criterion.
///
/// This always indicates a construction bug, for example a state built for a
/// different criterion. It is never recovered from automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("node at {} expected {}, found {}", display_path(.path), .expected, .found)]
pub struct StructureError {
    /// Child indices from the root to the mismatching node.
    pub path: Vec<usize>,
    pub expected: Shape,
    pub found: Shape,
}

fn display_path(path: &[usize]) -> String {
    if path.is_empty() {
        return "root".to_string();
    }
    let indices: Vec<String> = path.iter().map(ToString::to_string).collect();
    format!("root/{}", indices.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    type C = Criterion<(), (), ()>;

    #[test]
    fn new_mirrors_criterion_shape() {
        let criterion = C::after_iteration(5)
            & (C::after_duration(Duration::from_secs(1)) | C::after_iteration(2));
        let state = CriterionState::new(&criterion);

        assert_eq!(state.shape(), Shape::Group(2));
        assert_eq!(state.children()[0].shape(), Shape::Marker);
        assert_eq!(state.children()[1].shape(), Shape::Group(2));
        assert_eq!(state.children()[1].children()[0].shape(), Shape::Duration);
        assert!(state.check_shape(&criterion).is_ok());
    }

    #[test]
    fn reset_clears_leaves_and_keeps_shape() {
        let criterion = C::after_iteration(1) | C::after_duration(Duration::ZERO);
        let mut state = CriterionState::new(&criterion);

        let CriterionState::Group(group) = &mut state else {
            panic!("expected a group state");
        };
        group.children[0] = CriterionState::Marker(MarkerState {
            at_iteration: Some(1),
        });
        group.children[1] = CriterionState::Duration(DurationState {
            start: Some(Instant::now()),
            elapsed: Duration::from_millis(3),
            at_iteration: Some(0),
        });

        state.reset();

        assert_eq!(state, CriterionState::new(&criterion));
    }

    #[test]
    fn check_shape_reports_child_count_mismatch() {
        let two = C::after_iteration(1) | C::after_iteration(2);
        let three = two.clone() | C::after_iteration(3);
        let state = CriterionState::new(&two);

        let err = state.check_shape(&three).unwrap_err();

        assert_eq!(err.path, Vec::<usize>::new());
        assert_eq!(err.expected, Shape::Group(3));
        assert_eq!(err.found, Shape::Group(2));
        assert_eq!(err.to_string(), "node at root expected group of 3, found group of 2");
    }

    #[test]
    fn check_shape_reports_nested_leaf_mismatch() {
        let by_iteration = C::after_iteration(1) & (C::after_iteration(2) | C::after_iteration(3));
        let by_duration =
            C::after_iteration(1) & (C::after_iteration(2) | C::after_duration(Duration::ZERO));
        let state = CriterionState::new(&by_iteration);

        let err = state.check_shape(&by_duration).unwrap_err();

        assert_eq!(err.path, vec![1, 1]);
        assert_eq!(err.to_string(), "node at root/1/1 expected duration, found marker");
    }
}
