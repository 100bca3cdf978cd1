//! Speech channels: one wraps a recognizer, the other a synthesizer. Both are
//! small state machines driven by device events so they can be exercised with
//! fake devices.

pub mod input;
pub mod output;

pub use input::{
    ActivationGate, ActivationRefusal, ListenSession, RecognitionEvent, RecognitionOutcome,
    SpeechInputChannel, SpeechRecognizer,
};
pub use output::{
    SayOutcome, SpeechCompletion, SpeechOutputChannel, SpeechSynthesizer, SynthesisEvent,
    UtteranceId,
};

#[cfg(test)]
#[path = "../tests/speech_tests.rs"]
mod tests;
