//! The step-by-step voice dialog that fills in a product draft.
//!
//! The session walks name, description, price, and quantity in that order.
//! Each recognized transcript goes through [`transition`], a pure function of
//! the current step and the transcript, and the session applies its result.
//! Text answers are taken as spoken; number answers go through
//! [`parse_quantity_word`] and keep the session on the same step when they do
//! not parse.

use super::numbers::parse_quantity_word;
use crate::models::ProductDraft;
use tracing::{debug, warn};

/// Where the dialog is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStep {
    /// Waiting for the product name
    #[default]
    AwaitingName,
    /// Waiting for the description
    AwaitingDescription,
    /// Waiting for the price as a number word or integer
    AwaitingPrice,
    /// Waiting for the quantity as a number word or integer
    AwaitingQuantity,
    /// Every field is in
    Complete,
}

impl VoiceStep {
    /// Position in the field sequence; `Complete` is 4.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::AwaitingName => 0,
            Self::AwaitingDescription => 1,
            Self::AwaitingPrice => 2,
            Self::AwaitingQuantity => 3,
            Self::Complete => 4,
        }
    }

    /// What the recognizer asks the user at this step.
    #[must_use]
    pub const fn prompt(self) -> Option<&'static str> {
        match self {
            Self::AwaitingName => Some("Diga el nombre del producto."),
            Self::AwaitingDescription => Some("Diga la descripción del producto."),
            Self::AwaitingPrice => Some("Diga el precio del producto."),
            Self::AwaitingQuantity => Some("Diga la cantidad del producto."),
            Self::Complete => None,
        }
    }

    /// What the user is told when the answer at this step is rejected.
    #[must_use]
    pub const fn invalid_message(self) -> &'static str {
        match self {
            Self::AwaitingName => "Por favor, diga un nombre válido.",
            Self::AwaitingDescription => "Por favor, diga una descripción válida.",
            Self::AwaitingPrice => "Por favor, diga un precio válido.",
            Self::AwaitingQuantity => "Por favor, diga una cantidad válida.",
            Self::Complete => "",
        }
    }

    /// The step after this one; `Complete` stays put.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::AwaitingName => Self::AwaitingDescription,
            Self::AwaitingDescription => Self::AwaitingPrice,
            Self::AwaitingPrice => Self::AwaitingQuantity,
            Self::AwaitingQuantity | Self::Complete => Self::Complete,
        }
    }
}

/// One accepted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The spoken name
    Name(String),
    /// The spoken description
    Description(String),
    /// The parsed price
    Price(u32),
    /// The parsed quantity
    Quantity(u32),
}

/// Fields accepted so far; later fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Accepted name
    pub name: Option<String>,
    /// Accepted description
    pub description: Option<String>,
    /// Accepted price
    pub price: Option<u32>,
    /// Accepted quantity
    pub quantity: Option<u32>,
}

impl Collected {
    fn apply(&mut self, answer: Answer) {
        match answer {
            Answer::Name(name) => self.name = Some(name),
            Answer::Description(description) => self.description = Some(description),
            Answer::Price(price) => self.price = Some(price),
            Answer::Quantity(quantity) => self.quantity = Some(quantity),
        }
    }

    /// The finished draft, once every field is present.
    #[must_use]
    pub fn to_draft(&self) -> Option<ProductDraft> {
        Some(ProductDraft::new(
            self.name.clone()?,
            self.description.clone()?,
            self.quantity?,
            f64::from(self.price?),
        ))
    }
}

/// What the caller has to do after the session moved.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEffect {
    /// Ask the recognizer for the next answer with this prompt
    Prompt(&'static str),
    /// Tell the user the answer was not usable; do not re-prompt
    Invalid(&'static str),
    /// Nothing to do; the session waits for the caller
    Idle,
    /// All fields are in; hand the draft to the catalog
    Submit(ProductDraft),
}

/// Result of feeding one transcript to a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The step to move to
    pub next: VoiceStep,
    /// The answer to record, if the transcript was usable
    pub accepted: Option<Answer>,
    /// What the caller should do next
    pub effect: VoiceEffect,
}

impl Transition {
    const fn stay(step: VoiceStep, effect: VoiceEffect) -> Self {
        Self {
            next: step,
            accepted: None,
            effect,
        }
    }
}

/// Decides what one transcript does at one step.
///
/// `None` (the recognizer had nothing, or was cancelled) never changes the
/// step and asks for nothing. Reaching `Complete` yields
/// [`VoiceEffect::Idle`] here; the session replaces it with the draft.
#[must_use]
pub fn transition(step: VoiceStep, transcript: Option<&str>) -> Transition {
    let Some(transcript) = transcript else {
        return Transition::stay(step, VoiceEffect::Idle);
    };
    let text = transcript.trim();

    let accepted = match step {
        VoiceStep::Complete => return Transition::stay(step, VoiceEffect::Idle),
        VoiceStep::AwaitingName if !text.is_empty() => Some(Answer::Name(transcript.to_string())),
        VoiceStep::AwaitingDescription if !text.is_empty() => {
            Some(Answer::Description(transcript.to_string()))
        }
        VoiceStep::AwaitingPrice => parse_quantity_word(text).map(Answer::Price),
        VoiceStep::AwaitingQuantity => parse_quantity_word(text).map(Answer::Quantity),
        VoiceStep::AwaitingName | VoiceStep::AwaitingDescription => None,
    };

    let Some(answer) = accepted else {
        return Transition::stay(step, VoiceEffect::Invalid(step.invalid_message()));
    };

    let next = step.next();
    let effect = next.prompt().map_or(VoiceEffect::Idle, VoiceEffect::Prompt);
    Transition {
        next,
        accepted: Some(answer),
        effect,
    }
}

/// One voice-add dialog. Owned by whoever runs it and discarded (or
/// [`reset`](Self::reset)) once the draft has been submitted.
#[derive(Debug, Clone, Default)]
pub struct VoiceCaptureSession {
    step: VoiceStep,
    collected: Collected,
}

impl VoiceCaptureSession {
    /// A session waiting for the name with nothing collected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the dialog is.
    #[must_use]
    pub const fn step(&self) -> VoiceStep {
        self.step
    }

    /// Answers accepted so far.
    #[must_use]
    pub const fn collected(&self) -> &Collected {
        &self.collected
    }

    /// Back to the first step with nothing collected.
    pub fn reset(&mut self) {
        self.step = VoiceStep::AwaitingName;
        self.collected = Collected::default();
    }

    /// Resets and asks for the name.
    pub fn start(&mut self) -> VoiceEffect {
        self.reset();
        debug!("Voice session started");
        self.reprompt()
    }

    /// Asks again for the current step without touching collected data.
    #[must_use]
    pub fn reprompt(&self) -> VoiceEffect {
        self.step
            .prompt()
            .map_or(VoiceEffect::Idle, VoiceEffect::Prompt)
    }

    /// Feeds the recognizer's best transcript, or `None` if it had nothing.
    pub fn on_recognized(&mut self, transcript: Option<&str>) -> VoiceEffect {
        let Transition {
            next,
            accepted,
            effect,
        } = transition(self.step, transcript);

        if let VoiceEffect::Invalid(message) = effect {
            warn!(step = ?self.step, transcript, "Voice answer rejected: {}", message);
        }

        let Some(answer) = accepted else {
            return effect;
        };
        debug!(from = ?self.step, to = ?next, "Voice answer accepted: {:?}", answer);
        self.collected.apply(answer);
        self.step = next;

        if next == VoiceStep::Complete {
            // Every accepted answer fills its field, so the draft is complete here
            return self
                .collected
                .to_draft()
                .map_or(VoiceEffect::Idle, VoiceEffect::Submit);
        }
        effect
    }
}
