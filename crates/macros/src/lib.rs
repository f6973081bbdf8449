mod state;

use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Implements [`State`] for a struct with named fields.
///
/// The macro needs three fields, found by name or by a `#[state(...)]` marker:
///
/// | Role                   | Default field name         | Marker                     |
/// |------------------------|----------------------------|----------------------------|
/// | iteration counter      | `iteration`                | `#[state(iteration)]`      |
/// | current iterate        | `iterate`                  | `#[state(iterate)]`        |
/// | criterion state        | `stopping_criterion_state` | `#[state(criterion_state)]`|
///
/// The iterate field's type becomes [`State::Iterate`]. Any other fields are
/// left alone.
///
/// ## Restrictions
///
/// - The input struct must use named fields (not tuple or unit structs).
/// - The iteration field must be a `usize` and the criterion state field a
///   [`CriterionState`].
///
/// ## Example
///
/// ### Input
///
/// ```ignore
/// #[derive(State)]
/// struct DescentState {
///     iteration: usize,
///     #[state(iterate)]
///     x: [f64; 2],
///     cost: f64,
///     stopping_criterion_state: CriterionState,
/// }
/// ```
///
/// ### Expanded
///
/// ```ignore
/// impl ::cadence_core::State for DescentState {
///     type Iterate = [f64; 2];
///
///     fn iteration(&self) -> usize {
///         self.iteration
///     }
///
///     fn set_iteration(&mut self, iteration: usize) {
///         self.iteration = iteration;
///     }
///
///     fn iterate(&self) -> &Self::Iterate {
///         &self.x
///     }
///
///     fn stopping_criterion_state(&self) -> &::cadence_core::CriterionState {
///         &self.stopping_criterion_state
///     }
///
///     fn stopping_criterion_state_mut(&mut self) -> &mut ::cadence_core::CriterionState {
///         &mut self.stopping_criterion_state
///     }
/// }
/// ```
///
/// [`State`]: cadence_core::State
/// [`State::Iterate`]: cadence_core::State::Iterate
/// [`CriterionState`]: cadence_core::CriterionState
#[proc_macro_derive(State, attributes(state))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as state::Parsed);
    parsed.expand().into()
}
