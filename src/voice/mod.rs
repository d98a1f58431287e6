//! Voice entry - builds a product draft from spoken answers, one field at a time.

/// Dialog driver tying the session to a recognizer and the catalog
pub mod flow;
/// Spoken number parsing
pub mod numbers;
/// Speech recognizer contract
pub mod recognizer;
/// The field-by-field state machine
pub mod session;

pub use flow::{FlowOutcome, VoiceAddFlow};
pub use numbers::parse_quantity_word;
pub use recognizer::{ScriptedRecognizer, SpeechRecognizer};
pub use session::{VoiceCaptureSession, VoiceEffect, VoiceStep};
