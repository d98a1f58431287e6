//! The speech recognizer seen from the voice dialog.
//!
//! Recognition itself happens elsewhere; the dialog only needs "ask with this
//! prompt, get back the best transcript or nothing".

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Asks the user a question and returns what they said.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Returns the best transcript, or `None` if nothing usable was heard
    /// or the user cancelled.
    async fn recognize(&self, prompt: &str) -> Option<String>;
}

/// Replays a fixed list of answers and records the prompts it was given.
///
/// Once the script runs out every request yields `None`.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedRecognizer {
    /// Queues the answers to hand out, one per request; `None` means nothing was heard.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(Into::into)).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Appends answers to the end of the script.
    pub fn push<S: Into<String>>(&self, answer: Option<S>) {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back(answer.map(Into::into));
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(&self, prompt: &str) -> Option<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answers.lock().ok()?.pop_front().flatten()
    }
}
