//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use codex_engine::cards::{Answer, Card, CardId, Catalog, ChallengeSpec, Chapter, Cutscene};
use codex_engine::core::{
    Action, Difficulty, GameConfig, GameSession, Resource, ResourceDelta,
};
use codex_engine::events::Dispatch;
use codex_engine::rules::{CodexRules, RulesEngine};
use tracing_subscriber::EnvFilter;

/// Install a test log writer once. `RUST_LOG=codex_engine=debug` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

pub fn delta(entries: &[(Resource, i64)]) -> ResourceDelta {
    entries.iter().copied().collect()
}

/// Two-chapter catalog.
///
/// Chapter 1 (paradox mechanics) in draw order:
/// algebra, numerals, quiz, paper, translation, quiz2.
/// Required: algebra, numerals.
///
/// Chapter 2: fibonacci (figure), sequence, florence. Required: fibonacci, sequence.
pub fn catalog() -> Catalog {
    use Resource::*;

    let ch1 = Chapter::new("ch1", "Baghdad")
        .with_card(Card::tech(
            "algebra",
            "Algebraic Methods",
            delta(&[(Knowledge, 3), (Influence, 1)]),
            delta(&[(Knowledge, 2)]),
        ))
        .with_card(Card::tech(
            "numerals",
            "Hindu-Arabic Numerals",
            delta(&[(Knowledge, 1)]),
            delta(&[(Knowledge, 2)]),
        ))
        .with_card(
            Card::challenge(
                "quiz",
                "Scribe's Quiz",
                ResourceDelta::new(),
                ChallengeSpec::mcq("What does al-jabr mean?", ["completion", "restoration", "reduction"], [1])
                    .with_reward(delta(&[(Knowledge, 3)])),
            )
            .with_hint("It literally means restoration."),
        )
        .with_card(Card::event("paper", "Paper Mills", delta(&[(Data, 2)]), delta(&[(Knowledge, 1)])))
        .with_card(Card::event(
            "translation",
            "Translation Movement",
            delta(&[(Influence, 2)]),
            ResourceDelta::new(),
        ))
        .with_card(Card::challenge(
            "quiz2",
            "Capital Builders",
            ResourceDelta::new(),
            ChallengeSpec::mcq("Who built Baghdad?", ["Roman", "Abbasid"], [1])
                .with_reward(delta(&[(Knowledge, 2)])),
        ))
        .with_required("algebra")
        .with_required("numerals")
        .with_paradox();

    let ch2 = Chapter::new("ch2", "Renaissance")
        .with_card(Card::figure(
            "fibonacci",
            "Leonardo Fibonacci",
            delta(&[(Knowledge, 2)]),
            delta(&[(Data, 1)]),
        ))
        .with_card(Card::tech(
            "sequence",
            "Rabbit Problem",
            delta(&[(Data, 2)]),
            delta(&[(Knowledge, 3)]),
        ))
        .with_card(Card::event("florence", "Arrival in Florence", delta(&[(Influence, 1)]), ResourceDelta::new()))
        .with_required("fibonacci")
        .with_required("sequence");

    let mut catalog = Catalog::new(vec![ch1, ch2]).expect("fixture catalog is valid");
    catalog.finale = Some(Cutscene::new("Codex Complete", ""));
    catalog
}

pub fn rules() -> CodexRules {
    CodexRules::new(Arc::new(catalog()), GameConfig::default())
}

pub fn new_game(difficulty: Difficulty) -> Action {
    Action::NewGame {
        difficulty,
        force_backstory: false,
    }
}

/// Run an action that must be accepted.
pub fn step(rules: &CodexRules, session: &GameSession, action: Action) -> (GameSession, Dispatch) {
    let (next, dispatch) = rules.reduce(session, &action);
    assert!(
        dispatch.is_accepted(),
        "{action:?} refused: {:?}",
        dispatch.refused
    );
    (next, dispatch)
}

/// A session in chapter 1, past the arrival scene, hand drawn.
pub fn playable(rules: &CodexRules, difficulty: Difficulty) -> GameSession {
    let session = GameSession::new(rules.config());
    let (session, _) = step(rules, &session, new_game(difficulty));
    let (session, _) = step(rules, &session, Action::Proceed);
    assert!(session.is_playable());
    session
}

pub fn wrong() -> Answer {
    Answer::Choice(0)
}

pub fn right() -> Answer {
    Answer::Choice(1)
}

pub fn hand_contains(session: &GameSession, id: &str) -> bool {
    session.hand_ids().contains(&CardId::from(id))
}
