//! Line-oriented console input.
//!
//! The interactive UI reads its commands and, during voice entry, the typed
//! stand-in for each spoken answer from the same input stream.

use crate::voice::SpeechRecognizer;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Shared reader over a line stream.
pub struct ConsoleInput<R> {
    lines: Mutex<Lines<R>>,
}

impl ConsoleInput<BufReader<Stdin>> {
    /// Reads from the process standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleInput<R> {
    /// Reads lines from any buffered async reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }

    /// Prints `prompt` and reads one line. `None` at end of input.
    ///
    /// # Errors
    /// Returns an error if reading fails.
    pub async fn read_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{prompt}")?;
            stdout.flush()?;
        }
        self.lines.lock().await.next_line().await
    }
}

/// Treats each typed line as a recognized utterance.
///
/// A blank line, end of input, or a read error count as "nothing heard".
pub struct ConsoleRecognizer<'a, R> {
    input: &'a ConsoleInput<R>,
}

impl<'a, R> ConsoleRecognizer<'a, R> {
    /// Answers recognition requests from `input`.
    pub const fn new(input: &'a ConsoleInput<R>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechRecognizer for ConsoleRecognizer<'_, R> {
    async fn recognize(&self, prompt: &str) -> Option<String> {
        match self.input.read_line(&format!("🎤 {prompt} ")).await {
            Ok(Some(line)) if !line.trim().is_empty() => Some(line.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Console read failed during voice entry: {}", e);
                None
            }
        }
    }
}
