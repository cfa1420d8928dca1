//! Challenge questions and grading rules.
//!
//! Five question kinds:
//!
//! - `Mcq`: pick one option, or every correct option when several are correct
//! - `Drag`: arrange items into the expected order
//! - `Cloud`: select exactly the expected set of tokens, in any order
//! - `Figure`: pick the single correct option about an explanatory figure
//! - `Pseudo`: pick the single correct option about a pseudocode trace
//!
//! Grading is pure. Attempts, penalties, and rewards belong to the
//! `ChallengeEngine`, which calls [`ChallengeSpec::grade`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ResourceDelta;

/// Option indices (most questions have 1-4 correct answers).
pub type Indices = SmallVec<[usize; 4]>;

/// A question attached to a challenge card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChallengeSpec {
    Mcq {
        #[serde(default)]
        question: String,
        options: Vec<String>,
        answers: Indices,
        #[serde(default)]
        reward: ResourceDelta,
    },
    Drag {
        #[serde(default)]
        question: String,
        /// Items in their initial presented order.
        #[serde(default)]
        items: Vec<String>,
        answer: Vec<String>,
        #[serde(default)]
        reward: ResourceDelta,
    },
    Cloud {
        #[serde(default)]
        question: String,
        tokens: Vec<String>,
        answer: Vec<String>,
        #[serde(default)]
        reward: ResourceDelta,
    },
    Figure {
        #[serde(default)]
        question: String,
        options: Vec<String>,
        answers: Indices,
        /// Opaque presentation reference for the figure.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        figure: Option<String>,
        #[serde(default)]
        reward: ResourceDelta,
    },
    Pseudo {
        #[serde(default)]
        question: String,
        options: Vec<String>,
        answers: Indices,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default)]
        reward: ResourceDelta,
    },
}

/// A submitted answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// A single selected option (mcq, figure, pseudo).
    Choice(usize),
    /// Several selected options (multi-answer mcq).
    Choices(Indices),
    /// An arrangement of items (drag).
    Order(Vec<String>),
    /// A set of selected tokens (cloud).
    Selection(Vec<String>),
}

impl ChallengeSpec {
    /// Multiple-choice question.
    #[must_use]
    pub fn mcq<I, S, A>(question: impl Into<String>, options: I, answers: A) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        A: IntoIterator<Item = usize>,
    {
        ChallengeSpec::Mcq {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answers: answers.into_iter().collect(),
            reward: ResourceDelta::new(),
        }
    }

    /// Ordered-arrangement question. Items start in the given order.
    #[must_use]
    pub fn drag<I, J, S, T>(question: impl Into<String>, items: I, answer: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        ChallengeSpec::Drag {
            question: question.into(),
            items: items.into_iter().map(Into::into).collect(),
            answer: answer.into_iter().map(Into::into).collect(),
            reward: ResourceDelta::new(),
        }
    }

    /// Multi-select question.
    #[must_use]
    pub fn cloud<I, J, S, T>(question: impl Into<String>, tokens: I, answer: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        ChallengeSpec::Cloud {
            question: question.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
            answer: answer.into_iter().map(Into::into).collect(),
            reward: ResourceDelta::new(),
        }
    }

    /// Set the reward (builder pattern).
    #[must_use]
    pub fn with_reward(mut self, delta: ResourceDelta) -> Self {
        *self.reward_mut() = delta;
        self
    }

    fn reward_mut(&mut self) -> &mut ResourceDelta {
        match self {
            ChallengeSpec::Mcq { reward, .. }
            | ChallengeSpec::Drag { reward, .. }
            | ChallengeSpec::Cloud { reward, .. }
            | ChallengeSpec::Figure { reward, .. }
            | ChallengeSpec::Pseudo { reward, .. } => reward,
        }
    }

    /// Reward granted on a correct answer.
    #[must_use]
    pub fn reward(&self) -> &ResourceDelta {
        match self {
            ChallengeSpec::Mcq { reward, .. }
            | ChallengeSpec::Drag { reward, .. }
            | ChallengeSpec::Cloud { reward, .. }
            | ChallengeSpec::Figure { reward, .. }
            | ChallengeSpec::Pseudo { reward, .. } => reward,
        }
    }

    /// Question text.
    #[must_use]
    pub fn question(&self) -> &str {
        match self {
            ChallengeSpec::Mcq { question, .. }
            | ChallengeSpec::Drag { question, .. }
            | ChallengeSpec::Cloud { question, .. }
            | ChallengeSpec::Figure { question, .. }
            | ChallengeSpec::Pseudo { question, .. } => question,
        }
    }

    /// Kind name as written in catalogs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            ChallengeSpec::Mcq { .. } => "mcq",
            ChallengeSpec::Drag { .. } => "drag",
            ChallengeSpec::Cloud { .. } => "cloud",
            ChallengeSpec::Figure { .. } => "figure",
            ChallengeSpec::Pseudo { .. } => "pseudo",
        }
    }

    /// Grade a submitted answer.
    ///
    /// `tolerance` is the number of misplaced positions an arrangement may
    /// have and still pass; it only affects `Drag`. An answer of the wrong
    /// shape for the question kind is simply wrong.
    #[must_use]
    pub fn grade(&self, answer: &Answer, tolerance: u32) -> bool {
        match self {
            ChallengeSpec::Mcq { answers, .. } => match answers.as_slice() {
                [] => false,
                [single] => selected(answer).as_deref() == Some(&[*single][..]),
                many => selected(answer)
                    .is_some_and(|picked| many.iter().all(|a| picked.contains(a))),
            },
            ChallengeSpec::Drag { answer: expected, .. } => match answer {
                Answer::Order(order) => arrangement_matches(order, expected, tolerance),
                _ => false,
            },
            ChallengeSpec::Cloud { answer: expected, .. } => match answer {
                Answer::Selection(picked) => {
                    let mut picked: Vec<&str> = picked.iter().map(String::as_str).collect();
                    let mut expected: Vec<&str> = expected.iter().map(String::as_str).collect();
                    picked.sort_unstable();
                    expected.sort_unstable();
                    picked == expected
                }
                _ => false,
            },
            ChallengeSpec::Figure { answers, .. } | ChallengeSpec::Pseudo { answers, .. } => {
                match (answer, answers.first()) {
                    (Answer::Choice(choice), Some(correct)) => choice == correct,
                    _ => false,
                }
            }
        }
    }

    /// Explanation of the correct answer, shown after a wrong submission.
    #[must_use]
    pub fn explain(&self) -> String {
        match self {
            ChallengeSpec::Mcq { options, answers, .. }
            | ChallengeSpec::Figure { options, answers, .. }
            | ChallengeSpec::Pseudo { options, answers, .. } => {
                match answers.first().and_then(|&i| options.get(i)) {
                    Some(text) => format!("Correct answer: \u{201c}{text}\u{201d}."),
                    None => FALLBACK_EXPLANATION.to_string(),
                }
            }
            ChallengeSpec::Drag { answer, .. } => {
                format!("The correct order is: {}.", answer.join(" \u{2192} "))
            }
            ChallengeSpec::Cloud { answer, .. } => {
                format!("The correct set is: {}.", answer.join(", "))
            }
        }
    }

    /// Check internal consistency. Returns a reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ChallengeSpec::Mcq { options, answers, .. }
            | ChallengeSpec::Figure { options, answers, .. }
            | ChallengeSpec::Pseudo { options, answers, .. } => {
                if answers.is_empty() {
                    return Err("no correct answer".to_string());
                }
                if let Some(bad) = answers.iter().find(|&&i| i >= options.len()) {
                    return Err(format!("answer index {bad} out of {} options", options.len()));
                }
                Ok(())
            }
            ChallengeSpec::Drag { items, answer, .. } => {
                if answer.is_empty() {
                    return Err("empty arrangement".to_string());
                }
                if !items.is_empty() {
                    let mut a: Vec<&String> = items.iter().collect();
                    let mut b: Vec<&String> = answer.iter().collect();
                    a.sort();
                    b.sort();
                    if a != b {
                        return Err("answer is not an arrangement of the items".to_string());
                    }
                }
                Ok(())
            }
            ChallengeSpec::Cloud { tokens, answer, .. } => {
                match answer.iter().find(|a| !tokens.contains(a)) {
                    Some(missing) => Err(format!("answer token {missing:?} not offered")),
                    None => Ok(()),
                }
            }
        }
    }
}

const FALLBACK_EXPLANATION: &str = "That selection does not match the historical/technical facts.";

/// Normalize a choice-style answer to a sorted, de-duplicated index list.
fn selected(answer: &Answer) -> Option<Indices> {
    let mut picked: Indices = match answer {
        Answer::Choice(i) => smallvec::smallvec![*i],
        Answer::Choices(list) => list.clone(),
        _ => return None,
    };
    picked.sort_unstable();
    picked.dedup();
    Some(picked)
}

/// Same length, and at most `tolerance` positions differ.
fn arrangement_matches(order: &[String], expected: &[String], tolerance: u32) -> bool {
    if order.len() != expected.len() {
        return false;
    }
    let misplaced = order.iter().zip(expected).filter(|(a, b)| a != b).count();
    misplaced <= tolerance as usize
}
