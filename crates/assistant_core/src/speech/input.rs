use tracing::{debug, info, warn};

use crate::{
    error::{RecognitionErrorKind, RecognitionStartError},
    messages,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenSession(pub u64);

/// One-shot speech-to-text device. After a successful `start` the device
/// reports at most one transcript or error for the session and then exactly
/// one `Ended`.
pub trait SpeechRecognizer: Send {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self, session: ListenSession) -> Result<(), RecognitionStartError>;

    fn abort(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Transcript {
        session: ListenSession,
        text: String,
    },
    Failed {
        session: ListenSession,
        kind: RecognitionErrorKind,
    },
    Ended {
        session: ListenSession,
    },
}

impl RecognitionEvent {
    pub fn session(&self) -> ListenSession {
        match self {
            Self::Transcript { session, .. }
            | Self::Failed { session, .. }
            | Self::Ended { session } => *session,
        }
    }
}

/// What a finished listen session produced; handed out only once the
/// session has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Transcript(String),
    Failed(RecognitionErrorKind),
    NoResult,
}

/// Conditions outside the channel that decide whether listening may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivationGate {
    pub is_speaking: bool,
    pub has_recipe: bool,
    pub command_in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationRefusal {
    Disabled,
    Speaking,
    NoRecipe,
    CommandInFlight,
    AlreadyListening,
    StartFailed(String),
}

impl ActivationRefusal {
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Disabled => messages::STATUS_RECOGNITION_UNSUPPORTED,
            Self::Speaking => messages::STATUS_SPEAKING_WAIT,
            Self::NoRecipe => messages::STATUS_SELECT_RECIPE_FIRST,
            Self::CommandInFlight => messages::STATUS_COMMAND_IN_FLIGHT,
            Self::AlreadyListening => messages::STATUS_ALREADY_LISTENING,
            Self::StartFailed(_) => messages::STATUS_START_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputState {
    Idle,
    Listening(ListenSession),
    Captured(ListenSession, String),
    Failed(ListenSession, RecognitionErrorKind),
    Disabled,
}

impl InputState {
    fn session(&self) -> Option<ListenSession> {
        match self {
            Self::Listening(session) | Self::Captured(session, _) | Self::Failed(session, _) => {
                Some(*session)
            }
            Self::Idle | Self::Disabled => None,
        }
    }
}

pub struct SpeechInputChannel {
    recognizer: Box<dyn SpeechRecognizer>,
    state: InputState,
    next_session: u64,
}

impl SpeechInputChannel {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        let state = if recognizer.is_supported() {
            InputState::Idle
        } else {
            warn!("speech recognition unsupported; voice input disabled");
            InputState::Disabled
        };
        Self {
            recognizer,
            state,
            next_session: 1,
        }
    }

    /// True from a successful activation until the session's end event.
    pub fn is_listening(&self) -> bool {
        self.state.session().is_some()
    }

    pub fn is_disabled(&self) -> bool {
        self.state == InputState::Disabled
    }

    pub fn activate(&mut self, gate: ActivationGate) -> Result<ListenSession, ActivationRefusal> {
        match self.state {
            InputState::Disabled => return Err(ActivationRefusal::Disabled),
            InputState::Idle => {}
            _ => return Err(ActivationRefusal::AlreadyListening),
        }
        if gate.is_speaking {
            return Err(ActivationRefusal::Speaking);
        }
        if !gate.has_recipe {
            return Err(ActivationRefusal::NoRecipe);
        }
        if gate.command_in_flight {
            return Err(ActivationRefusal::CommandInFlight);
        }

        let session = ListenSession(self.next_session);
        self.next_session += 1;
        match self.recognizer.start(session) {
            Ok(()) => {
                self.state = InputState::Listening(session);
                info!(session = session.0, "listening started");
                Ok(session)
            }
            Err(RecognitionStartError::Unsupported) => {
                warn!("recognizer reported no platform support; voice input disabled");
                self.state = InputState::Disabled;
                Err(ActivationRefusal::Disabled)
            }
            Err(RecognitionStartError::Device(reason)) => {
                warn!(%reason, "recognizer failed to start");
                Err(ActivationRefusal::StartFailed(reason))
            }
        }
    }

    /// Drops the live session, if any. Events still arriving for it are ignored.
    pub fn abort(&mut self) -> bool {
        match self.state.session() {
            Some(session) => {
                self.recognizer.abort();
                self.state = InputState::Idle;
                debug!(session = session.0, "listening aborted");
                true
            }
            None => false,
        }
    }

    pub fn on_event(&mut self, event: RecognitionEvent) -> Option<RecognitionOutcome> {
        let session = event.session();
        if self.state.session() != Some(session) {
            debug!(session = session.0, "ignoring event from inactive listen session");
            return None;
        }

        match event {
            RecognitionEvent::Transcript { text, .. } => {
                if let InputState::Listening(_) = self.state {
                    self.state = InputState::Captured(session, text);
                }
                None
            }
            RecognitionEvent::Failed { kind, .. } => {
                if let InputState::Listening(_) = self.state {
                    self.state = InputState::Failed(session, kind);
                }
                None
            }
            RecognitionEvent::Ended { .. } => {
                let finished = std::mem::replace(&mut self.state, InputState::Idle);
                let outcome = match finished {
                    InputState::Captured(_, text) => RecognitionOutcome::Transcript(text),
                    InputState::Failed(_, kind) => {
                        if !kind.is_retryable() {
                            self.state = InputState::Disabled;
                        }
                        RecognitionOutcome::Failed(kind)
                    }
                    _ => RecognitionOutcome::NoResult,
                };
                debug!(session = session.0, "listen session ended");
                Some(outcome)
            }
        }
    }
}
