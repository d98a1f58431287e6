//! Runs a voice-add dialog against a recognizer and submits the result.
//!
//! The flow keeps asking as long as answers are accepted. It stops and hands
//! control back to the caller when the recognizer returns nothing, when an
//! answer is rejected, or when the product has been submitted. Only one
//! recognition request is outstanding at a time.

use super::recognizer::SpeechRecognizer;
use super::session::{VoiceCaptureSession, VoiceEffect, VoiceStep};
use crate::catalog::ProductCatalogView;
use crate::errors::Error;
use crate::models::Product;
use tracing::{error, info};

/// Shown after a voice-entered product is saved.
pub const SUBMITTED_MESSAGE: &str = "Producto agregado por voz.";
/// Shown when saving a voice-entered product fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "Error al agregar producto por voz.";

/// Why the flow handed control back.
#[derive(Debug)]
pub enum FlowOutcome {
    /// The product was created; the session has been reset
    Submitted(Product),
    /// Creating the product failed; the session has been reset
    SubmitFailed(Error),
    /// The answer for `step` was rejected; call [`VoiceAddFlow::resume`] to retry
    Rejected {
        /// The step that is still waiting for an answer
        step: VoiceStep,
        /// What to tell the user
        message: &'static str,
    },
    /// The recognizer returned nothing at `step`
    NoResult {
        /// The step that is still waiting for an answer
        step: VoiceStep,
    },
}

impl FlowOutcome {
    /// Text to show the user, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Submitted(_) => Some(SUBMITTED_MESSAGE.to_string()),
            Self::SubmitFailed(e) => Some(format!("{SUBMIT_FAILED_MESSAGE} {}", e.user_message())),
            Self::Rejected { message, .. } => Some((*message).to_string()),
            Self::NoResult { .. } => None,
        }
    }
}

/// A voice-add dialog bound to a recognizer and a catalog.
pub struct VoiceAddFlow<'a> {
    recognizer: &'a dyn SpeechRecognizer,
    catalog: &'a ProductCatalogView,
    session: VoiceCaptureSession,
}

impl<'a> VoiceAddFlow<'a> {
    /// Binds a fresh session to `recognizer` and `catalog`.
    #[must_use]
    pub fn new(recognizer: &'a dyn SpeechRecognizer, catalog: &'a ProductCatalogView) -> Self {
        Self {
            recognizer,
            catalog,
            session: VoiceCaptureSession::new(),
        }
    }

    /// The dialog state so far.
    #[must_use]
    pub const fn session(&self) -> &VoiceCaptureSession {
        &self.session
    }

    /// Starts over from the name and runs until the flow needs the caller.
    pub async fn start(&mut self) -> FlowOutcome {
        let effect = self.session.start();
        self.drive(effect).await
    }

    /// Asks again at the current step, keeping everything collected so far.
    pub async fn resume(&mut self) -> FlowOutcome {
        let effect = self.session.reprompt();
        self.drive(effect).await
    }

    /// Drops whatever was collected.
    pub fn abandon(&mut self) {
        info!(step = ?self.session.step(), "Voice entry abandoned");
        self.session.reset();
    }

    async fn drive(&mut self, mut effect: VoiceEffect) -> FlowOutcome {
        loop {
            effect = match effect {
                VoiceEffect::Prompt(prompt) => {
                    let transcript = self.recognizer.recognize(prompt).await;
                    self.session.on_recognized(transcript.as_deref())
                }
                VoiceEffect::Invalid(message) => {
                    return FlowOutcome::Rejected {
                        step: self.session.step(),
                        message,
                    };
                }
                VoiceEffect::Idle => {
                    return FlowOutcome::NoResult {
                        step: self.session.step(),
                    };
                }
                VoiceEffect::Submit(draft) => {
                    let result = self.catalog.create(&draft).await;
                    // No retry in place: the user starts a new dialog either way
                    self.session.reset();
                    return match result {
                        Ok(product) => {
                            info!("Product {} added by voice", product.id);
                            FlowOutcome::Submitted(product)
                        }
                        Err(e) => {
                            error!("Voice product submission failed: {}", e);
                            FlowOutcome::SubmitFailed(e)
                        }
                    };
                }
            };
        }
    }
}
