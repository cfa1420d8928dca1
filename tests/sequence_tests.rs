//! Chapter sequencing against the bundled catalog.

mod common;

use std::sync::Arc;

use codex_engine::cards::{Catalog, CardId};
use codex_engine::core::{Action, Difficulty, GameConfig, GameSession};
use codex_engine::events::{GameEvent, Refusal};
use codex_engine::rules::{CodexRules, RulesEngine};
use codex_engine::sequence::SequencePhase;
use codex_engine::tracking::ParadoxMeter;

use common::step;

const CODEX: &str = include_str!("../data/codex.json");

fn rules() -> CodexRules {
    let catalog = Catalog::from_json(CODEX).expect("bundled catalog parses");
    CodexRules::new(Arc::new(catalog), GameConfig::default())
}

fn shown(events: &[GameEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CutsceneShown(c) => Some(c.title.as_str()),
            _ => None,
        })
        .collect()
}

fn ids(session: &GameSession) -> Vec<String> {
    session.hand_ids().iter().map(ToString::to_string).collect()
}

/// Walk through backstory, gate, and arrival on `difficulty`.
fn through_intro(rules: &CodexRules, difficulty: Difficulty) -> GameSession {
    let session = GameSession::new(rules.config());
    let (mut session, _) = step(rules, &session, common::new_game(Difficulty::Medium));
    while session.sequence.phase() == SequencePhase::Cutscene {
        session = step(rules, &session, Action::Proceed).0;
    }
    let (mut session, _) = step(rules, &session, Action::ChooseDifficulty(difficulty));
    while session.sequence.phase() == SequencePhase::Cutscene {
        session = step(rules, &session, Action::Proceed).0;
    }
    session
}

#[test]
fn test_bundled_catalog_shape() {
    let catalog = Catalog::from_json(CODEX).unwrap();

    assert_eq!(catalog.len(), 3);
    assert!(catalog.chapters[0].paradox_mechanics);
    assert!(!catalog.chapters[1].paradox_mechanics);
    assert!(catalog.is_last(2));
    assert_eq!(catalog.year_of(&CardId::from("ada")), 1843);
    assert_eq!(catalog.year_of(&CardId::from("arrival-tigris")), codex_engine::cards::UNKNOWN_YEAR);
}

#[test]
fn test_opening_walks_backstory_gate_arrival() {
    common::init_tracing();
    let rules = rules();
    let session = GameSession::new(rules.config());

    let (session, dispatch) = step(&rules, &session, common::new_game(Difficulty::Medium));
    assert_eq!(shown(&dispatch.events), vec!["Backstory – The Codex Paradox"]);
    assert!(session.hand_ids().is_empty());

    let (session, d2) = step(&rules, &session, Action::Proceed);
    let (session, d3) = step(&rules, &session, Action::Proceed);
    assert_eq!(shown(&d2.events), vec!["Activating the Chrono-Gate"]);
    assert_eq!(shown(&d3.events), vec!["Through the Rift"]);

    let (session, dispatch) = step(&rules, &session, Action::Proceed);
    assert!(dispatch.has(|e| matches!(e, GameEvent::DifficultyRequested)));
    assert_eq!(session.sequence.phase(), SequencePhase::AwaitingDifficulty);
    assert_eq!(rules.legal_actions(&session).len(), 3);

    // Gameplay and proceeding both wait on the gate
    let (_, refused) = rules.reduce(&session, &Action::Proceed);
    assert_eq!(refused.refused, Some(Refusal::NothingToProceed));
    let (_, refused) = rules.reduce(&session, &Action::Draw);
    assert_eq!(refused.refused, Some(Refusal::NotPlayable));

    let (session, dispatch) = step(&rules, &session, Action::ChooseDifficulty(Difficulty::Easy));
    assert!(dispatch.has(|e| matches!(e, GameEvent::DifficultyChosen(Difficulty::Easy))));
    assert_eq!(shown(&dispatch.events), vec!["Arrival in the Heart of Civilization"]);
    assert_eq!(session.difficulty, Difficulty::Easy);

    let (session, _) = step(&rules, &session, Action::Proceed);
    let (session, dispatch) = step(&rules, &session, Action::Proceed);
    assert!(session.is_playable());
    assert!(dispatch.has(|e| matches!(e, GameEvent::CardsDrawn { .. })));
    // Easy opening hand
    assert_eq!(session.hand_ids().len(), 5);
}

#[test]
fn test_choose_difficulty_outside_gate_is_refused() {
    let rules = rules();
    let session = through_intro(&rules, Difficulty::Medium);

    let (after, dispatch) = rules.reduce(&session, &Action::ChooseDifficulty(Difficulty::Hard));

    assert_eq!(dispatch.refused, Some(Refusal::NoDifficultyGate));
    assert_eq!(after.difficulty, Difficulty::Medium);
}

#[test]
fn test_deck_is_drawn_in_chronological_order() {
    let rules = rules();
    let session = through_intro(&rules, Difficulty::Easy);

    assert_eq!(
        ids(&session),
        vec!["quiz-baghdad-empire", "translation-movement", "hindu-arabic", "al-khwarizmi", "algebra"]
    );
    let rest: Vec<&str> = session.piles.draw_pile().iter().map(|c| c.id.as_str()).collect();
    // Undated cards last, in catalog order
    assert_eq!(
        rest,
        vec!["algorithm", "quiz-ch1", "tf-house-of-wisdom-1258", "arrival-tigris", "paper-mills"]
    );
}

#[test]
fn test_restart_skips_backstory_but_keeps_gate() {
    let rules = rules();
    let mut session = through_intro(&rules, Difficulty::Medium);
    session.paradox = ParadoxMeter::from_value(95);

    let (session, _) = step(&rules, &session, Action::play("quiz-baghdad-empire"));
    let (session, dispatch) = step(&rules, &session, Action::SubmitAnswer(common::wrong()));
    assert!(dispatch.has(|e| matches!(e, GameEvent::ChapterFailed { index: 0 })));
    assert_eq!(shown(&dispatch.events), vec!["Paradox Collapse"]);

    let (session, dispatch) = step(&rules, &session, Action::Proceed);

    assert!(shown(&dispatch.events).is_empty());
    assert!(dispatch.has(|e| matches!(e, GameEvent::DifficultyRequested)));
    assert_eq!(session.sequence.phase(), SequencePhase::AwaitingDifficulty);
    assert_eq!(session.paradox.value(), 0);
    assert_eq!(session.turn, 1);
}

#[test]
fn test_new_game_can_force_backstory() {
    let rules = rules();
    let session = through_intro(&rules, Difficulty::Medium);

    let (_, dispatch) = step(&rules, &session, common::new_game(Difficulty::Medium));
    assert_eq!(shown(&dispatch.events), Vec::<&str>::new());

    let (_, dispatch) = step(
        &rules,
        &session,
        Action::NewGame {
            difficulty: Difficulty::Medium,
            force_backstory: true,
        },
    );
    assert_eq!(shown(&dispatch.events), vec!["Backstory – The Codex Paradox"]);
}

#[test]
fn test_chapter_two_has_single_arrival_scene() {
    let rules = rules();
    let mut session = through_intro(&rules, Difficulty::Medium);
    session.progress = codex_engine::tracking::ProgressTracker::from_value(90);

    let (session, _) = step(&rules, &session, Action::play("translation-movement"));
    assert_eq!(session.sequence.phase(), SequencePhase::ChapterComplete);
    assert_eq!(
        session.sequence.current().map(|c| c.title.as_str()),
        Some("Era Restored")
    );

    let (session, dispatch) = step(&rules, &session, Action::Proceed);
    assert_eq!(shown(&dispatch.events), vec!["Renaissance – Seeds of Logic"]);
    assert_eq!(session.chapter_index, 1);

    let (session, _) = step(&rules, &session, Action::Proceed);
    assert!(session.is_playable());
    assert_eq!(session.hand_ids().len(), 4);
}
