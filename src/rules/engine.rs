//! Rules engine trait.

use crate::core::{Action, GameConfig, GameSession};
use crate::events::Dispatch;

/// A pure transition function over sessions.
///
/// ## Implementation Notes
///
/// - `reduce` must not mutate its input; a refused action returns an
///   unchanged copy and a `Dispatch` carrying the refusal
/// - `reduce` must be deterministic: the only randomness is the session's
///   own `GameRng`
/// - `legal_actions` lists what the host may offer; challenge answers are
///   free-form and are never enumerated
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Apply an action, returning the next session and what happened.
    fn reduce(&self, session: &GameSession, action: &Action) -> (GameSession, Dispatch);

    /// Actions the host may currently offer.
    fn legal_actions(&self, session: &GameSession) -> Vec<Action>;

    /// Whether the game is over.
    fn is_complete(&self, session: &GameSession) -> bool;

    /// Apply a sequence of actions, collecting every dispatch.
    ///
    /// Refused actions are skipped.
    fn reduce_all<'a, I>(&self, session: &GameSession, actions: I) -> (GameSession, Vec<Dispatch>)
    where
        I: IntoIterator<Item = &'a Action>,
    {
        let mut current = session.clone();
        let mut dispatches = Vec::new();
        for action in actions {
            let (next, dispatch) = self.reduce(&current, action);
            current = next;
            dispatches.push(dispatch);
        }
        (current, dispatches)
    }
}
