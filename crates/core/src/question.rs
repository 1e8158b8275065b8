//! Follow-up question normalisation.
//!
//! The diagnosis engine phrases its follow-up questions freely; this module
//! maps each one onto a fixed set of archetypes and swaps the engine's answer
//! choices for a canonical, human-readable set, so the caller renders the
//! same answers regardless of the engine's exact wording.
//!
//! Classification is an explicit ordered rule list evaluated top to bottom
//! with the first match winning: the exact binary choice-set check always
//! precedes the text cues, and the text cues are checked in a fixed order so
//! the tie-break between overlapping cues stays auditable.

use triage_types::{Question, QuestionChoice, QuestionItem};

/// Canonical archetypes a follow-up question can be mapped to.
///
/// A question that matches none of these keeps the engine's own choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionType {
    Duration,
    Location,
    Severity,
    Frequency,
    /// Binary yes/no/unknown question.
    Single,
    Onset,
    Character,
    Aggravating,
    Relieving,
}

/// The answer ids of a binary engine question.
const BINARY_CHOICE_IDS: [&str; 3] = ["present", "absent", "unknown"];

/// Ordered text-cue rules: the first rule with a matching cue wins.
/// Matching is case-insensitive substring search on the question text.
const TEXT_CUE_RULES: &[(QuestionType, &[&str])] = &[
    (QuestionType::Duration, &["how long", "duration"]),
    (
        QuestionType::Location,
        &["where exactly", "location", "where is", "which part"],
    ),
    (QuestionType::Severity, &["how severe", "intensity", "how bad"]),
    (
        QuestionType::Frequency,
        &["how often", "frequency", "how frequently"],
    ),
    (QuestionType::Onset, &["when did", "start", "begin"]),
    (QuestionType::Character, &["what type", "describe", "what kind"]),
    (QuestionType::Aggravating, &["worse", "aggravate", "triggers"]),
    (QuestionType::Relieving, &["better", "relieve", "improves"]),
];

/// A canonical answer with a stable id and a display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalChoice {
    pub id: &'static str,
    pub label: &'static str,
}

const fn choice(id: &'static str, label: &'static str) -> CanonicalChoice {
    CanonicalChoice { id, label }
}

const DURATION_ANSWERS: &[CanonicalChoice] = &[
    choice("less_than_30m", "Less than 30 minutes"),
    choice("30m_to_8h", "30 minutes to 8 hours"),
    choice("8h_to_24h", "8 to 24 hours"),
    choice("more_than_24h", "More than 24 hours"),
];

const LOCATION_ANSWERS: &[CanonicalChoice] = &[
    choice("center", "Center of chest/behind breastbone"),
    choice("left_side", "Left side of chest"),
    choice("right_side", "Right side of chest"),
    choice("widespread", "Widespread across chest"),
];

const SEVERITY_ANSWERS: &[CanonicalChoice] = &[
    choice("mild", "Mild - noticeable but not disturbing"),
    choice("moderate", "Moderate - uncomfortable but manageable"),
    choice("severe", "Severe - intense and very disturbing"),
];

const FREQUENCY_ANSWERS: &[CanonicalChoice] = &[
    choice("constant", "Constant"),
    choice("intermittent", "Comes and goes"),
    choice("occasional", "Occasional episodes"),
];

const ONSET_ANSWERS: &[CanonicalChoice] = &[
    choice("sudden", "Suddenly"),
    choice("gradual", "Gradually"),
];

const CHARACTER_ANSWERS: &[CanonicalChoice] = &[
    choice("sharp", "Sharp/Stabbing"),
    choice("dull", "Dull/Aching"),
    choice("pressure", "Pressure/Squeezing"),
    choice("burning", "Burning"),
];

const AGGRAVATING_ANSWERS: &[CanonicalChoice] = &[
    choice("movement", "Physical activity/Movement"),
    choice("breathing", "Deep breathing"),
    choice("lying", "Lying down"),
    choice("stress", "Stress/Anxiety"),
];

const RELIEVING_ANSWERS: &[CanonicalChoice] = &[
    choice("rest", "Rest"),
    choice("position", "Changing position"),
    choice("medication", "Medication"),
    choice("nothing", "Nothing helps"),
];

const SINGLE_ANSWERS: &[CanonicalChoice] = &[
    choice("present", "Yes"),
    choice("absent", "No"),
    choice("unknown", "I don't know"),
];

/// Canonical answer set for a question archetype.
pub fn canonical_answers(question_type: QuestionType) -> &'static [CanonicalChoice] {
    match question_type {
        QuestionType::Duration => DURATION_ANSWERS,
        QuestionType::Location => LOCATION_ANSWERS,
        QuestionType::Severity => SEVERITY_ANSWERS,
        QuestionType::Frequency => FREQUENCY_ANSWERS,
        QuestionType::Single => SINGLE_ANSWERS,
        QuestionType::Onset => ONSET_ANSWERS,
        QuestionType::Character => CHARACTER_ANSWERS,
        QuestionType::Aggravating => AGGRAVATING_ANSWERS,
        QuestionType::Relieving => RELIEVING_ANSWERS,
    }
}

/// Whether a choice list is exactly the binary `{present, absent, unknown}`
/// set: any order, no extras, no omissions.
pub fn is_binary_choice_set(choices: &[QuestionChoice]) -> bool {
    choices.len() == BINARY_CHOICE_IDS.len()
        && BINARY_CHOICE_IDS
            .iter()
            .all(|id| choices.iter().any(|c| c.id == *id))
}

/// Classify a follow-up question into an archetype.
///
/// The binary choice-set check takes priority over the text cues: a question
/// whose first item carries exactly `{present, absent, unknown}` is `Single`
/// regardless of its text. Otherwise the text cues decide, in rule order,
/// and a question matching no rule has no archetype.
pub fn classify(question: &Question) -> Option<QuestionType> {
    if let Some(item) = question.items.first() {
        if is_binary_choice_set(&item.choices) {
            return Some(QuestionType::Single);
        }
    }

    let text = question.text.to_lowercase();
    TEXT_CUE_RULES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| text.contains(cue)))
        .map(|(question_type, _)| *question_type)
}

/// Normalise a follow-up question.
///
/// Returns a new question with the first item's choices replaced by the
/// canonical answer set for its archetype; binary questions always get the
/// Yes/No/"I don't know" set, and unclassified questions keep the engine's
/// own choices. A question without items is returned unchanged. The input is
/// never mutated, and `text` and item `id`/`name` pass through untouched.
pub fn normalize(question: &Question) -> Question {
    let Some(item) = question.items.first() else {
        return question.clone();
    };

    let question_type = classify(question);
    tracing::debug!(?question_type, text = %question.text, "classified follow-up question");

    let choices = if is_binary_choice_set(&item.choices) {
        to_choices(SINGLE_ANSWERS)
    } else if let Some(question_type) = question_type {
        to_choices(canonical_answers(question_type))
    } else {
        item.choices.clone()
    };

    let mut items = question.items.clone();
    items[0] = QuestionItem {
        choices,
        ..item.clone()
    };

    Question {
        items,
        ..question.clone()
    }
}

fn to_choices(answers: &[CanonicalChoice]) -> Vec<QuestionChoice> {
    answers
        .iter()
        .map(|c| QuestionChoice {
            id: c.id.to_string(),
            label: c.label.to_string(),
        })
        .collect()
}
