//! The game's transition function.
//!
//! `CodexRules::reduce` clones the session (O(1) thanks to `im`), applies
//! the action to the clone, and returns it with a `Dispatch`. Handlers
//! return `Result<(), Refusal>`; on `Err` the clone is dropped and the
//! original session is handed back untouched.
//!
//! Cross-component effects all flow through here: the challenge engine
//! only reports a `Resolution`, and this module applies its reward,
//! progress, and paradox relief.

use std::sync::Arc;

use crate::cards::{Answer, Card, CardId, Catalog, Chapter};
use crate::challenge::{ChallengeEngine, ChallengePhase, Resolution};
use crate::core::{
    Action, ActionRecord, Difficulty, GameConfig, GameSession, ResourceBundle, ResourceDelta,
};
use crate::events::{Continuation, Dispatch, GameEvent, Refusal};
use crate::sequence::{SequencePhase, SequenceStep};
use crate::tracking::is_chapter_complete;

use super::engine::RulesEngine;

type Step = Result<(), Refusal>;

/// Rules for a catalog and configuration.
#[derive(Clone, Debug)]
pub struct CodexRules {
    catalog: Arc<Catalog>,
    config: GameConfig,
}

impl CodexRules {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: GameConfig) -> Self {
        Self { catalog, config }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Active chapter of a session.
    pub fn chapter(&self, session: &GameSession) -> Option<&Chapter> {
        self.catalog.chapter(session.chapter_index)
    }

    /// Card cost after the difficulty multiplier.
    #[must_use]
    pub fn scaled_cost(&self, card: &Card, difficulty: Difficulty) -> ResourceDelta {
        card.cost().scaled(self.config.preset(difficulty).cost_multiplier)
    }

    /// Re-enter the sequence for a session rebuilt from a snapshot.
    ///
    /// Snapshots carry no sequence phase, so a restored session starts out
    /// playable. A chapter that was already won or lost goes back to its
    /// terminal cutscene, and a save taken before the opening draw gets
    /// that draw now.
    pub fn resume(&self, session: &GameSession) -> (GameSession, Dispatch) {
        let mut next = session.clone();
        let mut out = Dispatch::default();

        match self.settle_restored(&mut next, &mut out) {
            Ok(()) => (next, out),
            Err(reason) => {
                tracing::warn!(%reason, "Restored session not resumed");
                (session.clone(), Dispatch::refused(reason))
            }
        }
    }

    fn settle_restored(&self, next: &mut GameSession, out: &mut Dispatch) -> Step {
        let chapter = self.active_chapter(next.chapter_index)?;
        self.check_completion(next, out)?;
        if next.sequence.is_playable() && chapter.paradox_mechanics && next.paradox.is_collapsed() {
            return self.fail_chapter(next, out);
        }
        if next.sequence.is_playable() && next.piles.hand().is_empty() && !next.piles.draw_pile().is_empty() {
            draw(next, self.config.initial_draw_count(next.difficulty), out);
        }
        Ok(())
    }

    fn active_chapter(&self, index: usize) -> Result<&Chapter, Refusal> {
        self.catalog.chapter(index).ok_or(Refusal::NoSuchChapter(index))
    }

    fn apply(&self, next: &mut GameSession, action: &Action, out: &mut Dispatch) -> Step {
        match action {
            Action::NewGame {
                difficulty,
                force_backstory,
            } => self.new_game(next, *difficulty, *force_backstory, out),
            Action::ChooseDifficulty(difficulty) => self.choose_difficulty(next, *difficulty, out),
            Action::Proceed => {
                let step = next.sequence.proceed();
                self.follow(next, step, out)
            }
            Action::PlayCard(id) => self.play_card(next, id, out),
            Action::Draw => {
                require_playable(next)?;
                draw(next, 1, out);
                Ok(())
            }
            Action::EndTurn => self.end_turn(next, out),
            Action::SubmitAnswer(answer) => self.submit_answer(next, answer, out),
            Action::SettleChallenge => {
                let decided = next
                    .challenge
                    .as_ref()
                    .ok_or(Refusal::NoChallenge)?
                    .phase()
                    .is_terminal();
                if !decided {
                    return Err(Refusal::ChallengeUndecided);
                }
                self.close_challenge(next, out)
            }
            Action::AbandonChallenge => self.close_challenge(next, out),
        }
    }

    // === Chapter entry ===

    fn new_game(&self, next: &mut GameSession, difficulty: Difficulty, force_backstory: bool, out: &mut Dispatch) -> Step {
        next.difficulty = difficulty;
        next.history = im::Vector::new();
        self.enter_chapter(next, 0, self.config.starting_resources, false, force_backstory, out)
    }

    fn enter_chapter(
        &self,
        next: &mut GameSession,
        index: usize,
        resources: ResourceBundle,
        restart: bool,
        force_backstory: bool,
        out: &mut Dispatch,
    ) -> Step {
        let chapter = self.active_chapter(index)?;
        next.reset_chapter(index, self.catalog.chronological_deck(chapter), resources);

        tracing::info!(
            index,
            chapter = %chapter.id,
            restart,
            resources = %resources,
            "Entering chapter"
        );
        out.push(GameEvent::ChapterEntered {
            index,
            chapter: chapter.id.clone(),
            resources,
            restart,
        });

        let draw_count = self.config.initial_draw_count(next.difficulty);
        let step = next.sequence.enter_chapter(chapter, draw_count, force_backstory);
        self.follow(next, step, out)
    }

    fn choose_difficulty(&self, next: &mut GameSession, difficulty: Difficulty, out: &mut Dispatch) -> Step {
        if next.sequence.phase() != SequencePhase::AwaitingDifficulty {
            return Err(Refusal::NoDifficultyGate);
        }
        next.difficulty = difficulty;
        out.push(GameEvent::DifficultyChosen(difficulty));

        let step = next
            .sequence
            .choose_difficulty(self.config.initial_draw_count(difficulty));
        self.follow(next, step, out)
    }

    /// Carry out what the sequencer asked for.
    fn follow(&self, next: &mut GameSession, step: SequenceStep, out: &mut Dispatch) -> Step {
        match step {
            SequenceStep::ShowCutscene(cutscene) => out.push(GameEvent::CutsceneShown(cutscene)),
            SequenceStep::AwaitDifficulty => out.push(GameEvent::DifficultyRequested),
            SequenceStep::InitialDraw(count) => {
                if count > 0 {
                    draw(next, count, out);
                }
            }
            SequenceStep::AdvanceChapter => {
                let resources = next.resources.credit(&self.config.chapter_carry_bonus);
                let index = next.chapter_index + 1;
                return self.enter_chapter(next, index, resources, false, false, out);
            }
            SequenceStep::RestartChapter => {
                let index = next.chapter_index;
                return self.enter_chapter(next, index, self.config.starting_resources, true, false, out);
            }
            SequenceStep::GameComplete => {
                tracing::info!(turn = next.turn, "Game complete");
                out.push(GameEvent::GameCompleted);
            }
            SequenceStep::Ignored => return Err(Refusal::NothingToProceed),
        }
        Ok(())
    }

    // === Gameplay ===

    fn play_card(&self, next: &mut GameSession, id: &CardId, out: &mut Dispatch) -> Step {
        require_playable(next)?;
        let card = next
            .piles
            .in_hand(id)
            .cloned()
            .ok_or_else(|| Refusal::NotInHand(id.clone()))?;

        let cost = self.scaled_cost(&card, next.difficulty);
        if !next.resources.can_afford(&cost) {
            return Err(Refusal::CannotAfford(id.clone()));
        }
        next.resources = next.resources.debit(&cost);

        let preset = self.config.preset(next.difficulty);
        if let Some(engine) = ChallengeEngine::open(Arc::clone(&card), next.difficulty, preset.challenge_tolerance) {
            next.piles.play_from_hand(id);
            tracing::debug!(card = %id, cost = %cost, kind = engine.spec().kind_name(), "Challenge opened");
            out.push(GameEvent::ChallengeOpened {
                card: id.clone(),
                kind: engine.spec().kind_name().to_string(),
                question: engine.spec().question().to_string(),
                attempts: engine.attempts_left(),
            });
            next.challenge = Some(engine);
            return Ok(());
        }

        let gain = card.gain().cloned().unwrap_or_default();
        next.resources = next.resources.credit(&gain);
        next.played.insert(card.id.clone());

        let chapter = self.active_chapter(next.chapter_index)?;
        let progress = next.progress.record_card_play(&card, chapter, &self.config);
        next.piles.play_from_hand(id);

        tracing::debug!(
            card = %id,
            cost = %cost,
            gain = %gain,
            progress = next.progress.value(),
            "Card played"
        );
        out.push(GameEvent::CardPlayed {
            card: id.clone(),
            cost,
            gain,
            progress,
        });

        draw(next, 1, out);
        self.check_completion(next, out)
    }

    fn end_turn(&self, next: &mut GameSession, out: &mut Dispatch) -> Step {
        require_playable(next)?;

        let income = next.passive_income();
        if !income.is_empty() {
            next.resources = next.resources.credit(&income);
            out.push(GameEvent::PassiveIncome(income));
        }
        next.turn += 1;
        out.push(GameEvent::TurnStarted { turn: next.turn });
        draw(next, 1, out);
        Ok(())
    }

    // === Challenges ===

    fn submit_answer(&self, next: &mut GameSession, answer: &Answer, out: &mut Dispatch) -> Step {
        let engine = next.challenge.as_mut().ok_or(Refusal::NoChallenge)?;
        let grading = engine
            .submit(answer, &self.config.ack_delays)
            .ok_or(Refusal::ChallengeDecided)?;
        let card = engine.card().id.clone();
        let attempts_left = engine.attempts_left();
        let hint = match grading.phase {
            ChallengePhase::WrongRetry => engine.hint().map(str::to_string),
            _ => None,
        };

        tracing::debug!(
            card = %card,
            correct = grading.correct,
            penalty = grading.paradox_penalty,
            attempts_left,
            "Answer graded"
        );
        out.push(GameEvent::AnswerGraded {
            card: card.clone(),
            correct: grading.correct,
            phase: grading.phase,
            message: grading.message,
            attempts_left,
        });
        if let Some(hint) = hint {
            out.push(GameEvent::HintAvailable {
                card: card.clone(),
                hint,
            });
        }

        if grading.paradox_penalty > 0 {
            let value = next.paradox.bump(grading.paradox_penalty);
            out.push(GameEvent::ParadoxChanged {
                value,
                tier: next.paradox.tier(),
            });
        }

        let chapter = self.active_chapter(next.chapter_index)?;
        if chapter.paradox_mechanics && next.paradox.is_collapsed() {
            next.challenge = None;
            out.push(GameEvent::ChallengeResolved {
                card,
                success: false,
                reward: None,
            });
            return self.fail_chapter(next, out);
        }

        if let Some(settlement) = grading.settlement {
            out.continuation = Some(Continuation::SettleChallenge {
                after: settlement.after,
            });
        }
        Ok(())
    }

    /// Settle (or abandon) the open challenge.
    fn close_challenge(&self, next: &mut GameSession, out: &mut Dispatch) -> Step {
        let engine = next.challenge.take().ok_or(Refusal::NoChallenge)?;
        let card = engine.card().id.clone();
        let resolution = engine.close();
        self.apply_resolution(next, card, resolution, out)
    }

    fn apply_resolution(&self, next: &mut GameSession, card: CardId, resolution: Resolution, out: &mut Dispatch) -> Step {
        tracing::debug!(card = %card, success = resolution.success, "Challenge resolved");

        if !resolution.success {
            out.push(GameEvent::ChallengeResolved {
                card,
                success: false,
                reward: None,
            });
            return Ok(());
        }

        if let Some(reward) = &resolution.reward {
            next.resources = next.resources.credit(reward);
        }
        next.progress.record_challenge_success(&self.config);
        let value = next.paradox.relieve(self.config.paradox_relief);
        next.played.insert(card.clone());

        out.push(GameEvent::ChallengeResolved {
            card,
            success: true,
            reward: resolution.reward,
        });
        out.push(GameEvent::ParadoxChanged {
            value,
            tier: next.paradox.tier(),
        });
        self.check_completion(next, out)
    }

    // === Chapter end ===

    fn check_completion(&self, next: &mut GameSession, out: &mut Dispatch) -> Step {
        if !next.sequence.is_playable() {
            return Ok(());
        }
        let index = next.chapter_index;
        let chapter = self.active_chapter(index)?;
        if !is_chapter_complete(chapter, &next.played) && !next.progress.is_full() {
            return Ok(());
        }

        let is_last = self.catalog.is_last(index);
        let cutscene = if is_last {
            self.catalog.finale_cutscene()
        } else {
            self.catalog.completion_cutscene(chapter)
        };

        tracing::info!(
            index,
            chapter = %chapter.id,
            progress = next.progress.value(),
            turn = next.turn,
            "Chapter complete"
        );
        out.push(GameEvent::ChapterCompleted { index });
        let step = next.sequence.complete_chapter(cutscene, is_last);
        self.follow(next, step, out)
    }

    fn fail_chapter(&self, next: &mut GameSession, out: &mut Dispatch) -> Step {
        let index = next.chapter_index;
        let chapter = self.active_chapter(index)?;

        tracing::info!(
            index,
            chapter = %chapter.id,
            paradox = next.paradox.value(),
            "Chapter failed: paradox collapse"
        );
        out.push(GameEvent::ChapterFailed { index });
        let step = next.sequence.fail_chapter(self.catalog.failure_cutscene(chapter));
        self.follow(next, step, out)
    }
}

impl RulesEngine for CodexRules {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn reduce(&self, session: &GameSession, action: &Action) -> (GameSession, Dispatch) {
        let mut next = session.clone();
        let mut out = Dispatch::default();

        match self.apply(&mut next, action, &mut out) {
            Ok(()) => {
                next.record_action(ActionRecord::new(session.turn, action.clone()));
                tracing::debug!(?action, events = out.events.len(), "Action applied");
                (next, out)
            }
            Err(reason) => {
                tracing::debug!(?action, %reason, "Action refused");
                (session.clone(), Dispatch::refused(reason))
            }
        }
    }

    fn legal_actions(&self, session: &GameSession) -> Vec<Action> {
        if let Some(engine) = &session.challenge {
            return if engine.phase().is_terminal() {
                vec![Action::SettleChallenge]
            } else {
                vec![Action::AbandonChallenge]
            };
        }

        match session.sequence.phase() {
            SequencePhase::Cutscene | SequencePhase::ChapterComplete | SequencePhase::ChapterFailed => {
                vec![Action::Proceed]
            }
            SequencePhase::AwaitingDifficulty => Difficulty::ALL
                .into_iter()
                .map(Action::ChooseDifficulty)
                .collect(),
            SequencePhase::Playable => {
                let mut actions: Vec<Action> = session
                    .piles
                    .hand()
                    .iter()
                    .filter(|card| {
                        session
                            .resources
                            .can_afford(&self.scaled_cost(card, session.difficulty))
                    })
                    .map(|card| Action::PlayCard(card.id.clone()))
                    .collect();
                actions.push(Action::Draw);
                actions.push(Action::EndTurn);
                actions
            }
            SequencePhase::Idle | SequencePhase::GameComplete => Vec::new(),
        }
    }

    fn is_complete(&self, session: &GameSession) -> bool {
        session.sequence.phase() == SequencePhase::GameComplete
    }
}

fn require_playable(session: &GameSession) -> Step {
    if session.challenge.is_some() {
        return Err(Refusal::ChallengeOpen);
    }
    if !session.sequence.is_playable() {
        return Err(Refusal::NotPlayable);
    }
    Ok(())
}

fn draw(next: &mut GameSession, count: usize, out: &mut Dispatch) {
    let report = next.piles.draw(count, &mut next.rng);
    if !report.drawn.is_empty() {
        out.push(GameEvent::CardsDrawn {
            cards: report.drawn,
            reshuffled: report.reshuffled,
        });
    }
}
