use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

/// Text-to-speech device. `speak` returns immediately; the device reports
/// completion later through a `SynthesisEvent` carrying the same id.
pub trait SpeechSynthesizer: Send {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: UtteranceId, text: &str);

    fn cancel(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    Finished { utterance: UtteranceId },
    Failed { utterance: UtteranceId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SayOutcome {
    Speaking(UtteranceId),
    /// No synthesizer on this platform; the caller shows the text instead.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCompletion {
    Completed,
    Failed(String),
    /// Completion of an utterance that was already cancelled or replaced.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputState {
    Idle,
    Speaking(UtteranceId),
}

pub struct SpeechOutputChannel {
    synthesizer: Box<dyn SpeechSynthesizer>,
    state: OutputState,
    next_utterance: u64,
}

impl SpeechOutputChannel {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            state: OutputState::Idle,
            next_utterance: 1,
        }
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, OutputState::Speaking(_))
    }

    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    /// Starts narrating `text`. Anything still being said is cancelled first.
    pub fn say(&mut self, text: &str) -> SayOutcome {
        if !self.synthesizer.is_supported() {
            debug!("speech synthesis unavailable; narration shown as text");
            return SayOutcome::Unsupported;
        }
        if let OutputState::Speaking(previous) = self.state {
            debug!(utterance = previous.0, "cancelling narration in progress");
            self.synthesizer.cancel();
        }
        let utterance = UtteranceId(self.next_utterance);
        self.next_utterance += 1;
        self.state = OutputState::Speaking(utterance);
        self.synthesizer.speak(utterance, text);
        debug!(utterance = utterance.0, "narration started");
        SayOutcome::Speaking(utterance)
    }

    /// Returns whether anything was actually cut off.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            OutputState::Speaking(utterance) => {
                self.synthesizer.cancel();
                self.state = OutputState::Idle;
                debug!(utterance = utterance.0, "narration cancelled");
                true
            }
            OutputState::Idle => false,
        }
    }

    pub fn on_event(&mut self, event: SynthesisEvent) -> SpeechCompletion {
        let (utterance, failure) = match event {
            SynthesisEvent::Finished { utterance } => (utterance, None),
            SynthesisEvent::Failed { utterance, reason } => (utterance, Some(reason)),
        };
        if self.state != OutputState::Speaking(utterance) {
            debug!(utterance = utterance.0, "ignoring completion of superseded narration");
            return SpeechCompletion::Stale;
        }
        self.state = OutputState::Idle;
        match failure {
            None => SpeechCompletion::Completed,
            Some(reason) => {
                warn!(utterance = utterance.0, %reason, "speech synthesis failed");
                SpeechCompletion::Failed(reason)
            }
        }
    }
}
