//! The assistant reducer: every external event is applied here, one at a
//! time, and every outbound request leaves as a `ServiceCommand`.

use shared::{
    domain::{FilterCategory, Recipe, RecipeId, RecipeSummary},
    protocol::{InterpretRequest, InterpretResponse},
};
use tracing::{debug, info, warn};

use crate::{
    dispatcher::CommandDispatcher,
    error::{AssistantError, CatalogError, InterpreterError, RecognitionErrorKind},
    messages,
    session::{SessionSnapshot, SessionState, SpeechFlags},
    speech::{
        ActivationGate, RecognitionEvent, RecognitionOutcome, SayOutcome, SpeechCompletion,
        SpeechInputChannel, SpeechOutputChannel, SpeechRecognizer, SpeechSynthesizer,
        SynthesisEvent,
    },
    view::{ViewController, ViewModel, DEFAULT_FILTERS},
};

/// Identifies one outbound request: the session generation it was issued in
/// and a sequence number unique across all requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub generation: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ShowList,
    SetFilter(String),
    OpenRecipe(RecipeId),
    NextStep,
    RepeatStep,
    GoToStep(usize),
    StartListening,
}

#[derive(Debug)]
pub enum AssistantEvent {
    Ui(UiAction),
    Recognition(RecognitionEvent),
    Synthesis(SynthesisEvent),
    RecipeListFetched {
        ticket: RequestTicket,
        result: Result<Vec<RecipeSummary>, CatalogError>,
    },
    RecipeFetched {
        ticket: RequestTicket,
        result: Result<Recipe, CatalogError>,
    },
    CommandInterpreted {
        ticket: RequestTicket,
        result: Result<InterpretResponse, InterpreterError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCommand {
    FetchRecipeList {
        ticket: RequestTicket,
        filter: FilterCategory,
    },
    FetchRecipe {
        ticket: RequestTicket,
        id: RecipeId,
    },
    Interpret {
        ticket: RequestTicket,
        request: InterpretRequest,
    },
}

impl ServiceCommand {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            Self::FetchRecipeList { ticket, .. }
            | Self::FetchRecipe { ticket, .. }
            | Self::Interpret { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RequestTracker {
    next_seq: u64,
    latest_list: Option<u64>,
    latest_recipe: Option<(u64, RecipeId)>,
}

impl RequestTracker {
    pub(crate) fn issue(&mut self, generation: u64) -> RequestTicket {
        self.next_seq += 1;
        RequestTicket {
            generation,
            seq: self.next_seq,
        }
    }

    pub(crate) fn issue_list(&mut self, generation: u64) -> RequestTicket {
        let ticket = self.issue(generation);
        self.latest_list = Some(ticket.seq);
        ticket
    }

    pub(crate) fn issue_recipe(&mut self, generation: u64, id: RecipeId) -> RequestTicket {
        let ticket = self.issue(generation);
        self.latest_recipe = Some((ticket.seq, id));
        ticket
    }

    /// Consumes the pending list request if `ticket` is it.
    pub(crate) fn settle_list(&mut self, ticket: RequestTicket) -> bool {
        if self.latest_list == Some(ticket.seq) {
            self.latest_list = None;
            true
        } else {
            false
        }
    }

    /// Consumes the pending recipe request if `ticket` is it, returning the
    /// id that was asked for.
    pub(crate) fn settle_recipe(&mut self, ticket: RequestTicket) -> Option<RecipeId> {
        match self.latest_recipe {
            Some((seq, id)) if seq == ticket.seq => {
                self.latest_recipe = None;
                Some(id)
            }
            _ => None,
        }
    }

    pub(crate) fn forget_recipe(&mut self) {
        self.latest_recipe = None;
    }
}

pub struct Assistant {
    pub(crate) session: SessionState,
    pub(crate) output: SpeechOutputChannel,
    pub(crate) input: SpeechInputChannel,
    pub(crate) dispatcher: CommandDispatcher,
    pub(crate) view: ViewController,
    pub(crate) requests: RequestTracker,
    outbox: Vec<ServiceCommand>,
    last_error: Option<AssistantError>,
}

impl Assistant {
    pub fn new(
        synthesizer: Box<dyn SpeechSynthesizer>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        Self::with_filters(synthesizer, recognizer, DEFAULT_FILTERS)
    }

    pub fn with_filters<I, S>(
        synthesizer: Box<dyn SpeechSynthesizer>,
        recognizer: Box<dyn SpeechRecognizer>,
        filters: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            session: SessionState::new(),
            output: SpeechOutputChannel::new(synthesizer),
            input: SpeechInputChannel::new(recognizer),
            dispatcher: CommandDispatcher::default(),
            view: ViewController::new(filters),
            requests: RequestTracker::default(),
            outbox: Vec::new(),
            last_error: None,
        }
    }

    /// Initial load: list view under the default filter.
    pub fn start(&mut self) {
        self.go_to_list(None);
    }

    pub fn handle(&mut self, event: AssistantEvent) {
        match event {
            AssistantEvent::Ui(action) => self.apply_ui_action(action),
            AssistantEvent::Recognition(event) => self.on_recognition_event(event),
            AssistantEvent::Synthesis(event) => self.on_synthesis_event(event),
            AssistantEvent::RecipeListFetched { ticket, result } => {
                self.on_recipe_list_fetched(ticket, result)
            }
            AssistantEvent::RecipeFetched { ticket, result } => {
                self.on_recipe_fetched(ticket, result)
            }
            AssistantEvent::CommandInterpreted { ticket, result } => {
                self.on_command_interpreted(ticket, result)
            }
        }
    }

    pub fn apply_ui_action(&mut self, action: UiAction) {
        debug!(?action, "ui action");
        match action {
            UiAction::ShowList => self.go_to_list(None),
            UiAction::SetFilter(category) => self.set_filter(&category),
            UiAction::OpenRecipe(id) => self.open_recipe(id),
            UiAction::NextStep => self.advance_step(),
            UiAction::RepeatStep => self.repeat_step(),
            UiAction::GoToStep(index) => self.go_to_step(index),
            UiAction::StartListening => self.activate_listening(),
        }
    }

    pub fn take_commands(&mut self) -> Vec<ServiceCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(SpeechFlags {
            is_listening: self.input.is_listening(),
            is_speaking: self.output.is_speaking(),
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn status_line(&self) -> &str {
        self.view.status_line()
    }

    pub fn narration_log(&self) -> &str {
        self.view.narration_log()
    }

    pub fn last_error(&self) -> Option<&AssistantError> {
        self.last_error.as_ref()
    }

    pub fn is_voice_input_disabled(&self) -> bool {
        self.input.is_disabled()
    }

    /// Whether the "Start Assistant" trigger should accept a click right now.
    pub fn assistant_enabled(&self) -> bool {
        self.session.active_recipe().is_some()
            && !self.output.is_speaking()
            && !self.input.is_listening()
            && !self.input.is_disabled()
            && !self.dispatcher.is_busy()
    }

    pub fn render(&self) -> ViewModel {
        self.view.render(&self.snapshot(), self.assistant_enabled())
    }

    pub fn activate_listening(&mut self) {
        let gate = ActivationGate {
            is_speaking: self.output.is_speaking(),
            has_recipe: self.session.active_recipe().is_some(),
            command_in_flight: self.dispatcher.is_busy(),
        };
        match self.input.activate(gate) {
            Ok(_) => self.view.set_status(messages::STATUS_LISTENING),
            Err(refusal) => {
                debug!(?refusal, "listening refused");
                self.view.set_status(refusal.status_message());
            }
        }
    }

    pub(crate) fn emit(&mut self, command: ServiceCommand) {
        debug!(?command, "service command queued");
        self.outbox.push(command);
    }

    pub(crate) fn record_error(&mut self, error: AssistantError) {
        warn!(%error, "assistant error");
        self.last_error = Some(error);
    }

    /// Status shown once nothing is being said.
    pub(crate) fn ready_status(&self) -> &'static str {
        if self.session.active_recipe().is_some() {
            messages::STATUS_READY
        } else {
            messages::STATUS_SELECT_RECIPE
        }
    }

    /// Speaks `text`, cutting off any earlier narration. A live listen
    /// session is aborted first so the assistant never hears itself.
    pub(crate) fn narrate(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if self.input.abort() {
            info!("listening aborted to narrate");
        }
        match self.output.say(text) {
            SayOutcome::Speaking(_) => {}
            SayOutcome::Unsupported => {
                self.view.set_narration_log(text);
                let status = if self.session.active_recipe().is_some() {
                    messages::STATUS_SYNTHESIS_UNAVAILABLE
                } else {
                    messages::STATUS_SELECT_RECIPE
                };
                self.view.set_status(status);
            }
        }
    }

    fn on_synthesis_event(&mut self, event: SynthesisEvent) {
        match self.output.on_event(event) {
            SpeechCompletion::Stale => {}
            SpeechCompletion::Completed => {
                let status = self.ready_status();
                self.view.set_status(status);
            }
            SpeechCompletion::Failed(reason) => {
                self.record_error(AssistantError::SynthesisFailure(reason));
                let status = if self.session.active_recipe().is_some() {
                    messages::STATUS_SPEECH_ERROR
                } else {
                    messages::STATUS_SELECT_RECIPE
                };
                self.view.set_status(status);
            }
        }
    }

    fn on_recognition_event(&mut self, event: RecognitionEvent) {
        let Some(outcome) = self.input.on_event(event) else {
            return;
        };
        match outcome {
            RecognitionOutcome::Transcript(text) => {
                let transcript = text.trim().to_lowercase();
                if transcript.is_empty() {
                    self.on_recognition_failure(RecognitionErrorKind::NoSpeech);
                    return;
                }
                info!(%transcript, "transcript received");
                self.view.set_status(messages::status_transcript(&transcript));
                self.submit_utterance(&transcript);
            }
            RecognitionOutcome::Failed(kind) => self.on_recognition_failure(kind),
            RecognitionOutcome::NoResult => {
                debug!("listen session ended without a result");
                let status = self.ready_status();
                self.view.set_status(status);
            }
        }
    }

    fn on_recognition_failure(&mut self, kind: RecognitionErrorKind) {
        self.record_error(AssistantError::RecognitionFailure(kind));
        match kind {
            RecognitionErrorKind::Unsupported => {
                self.view.set_status(messages::STATUS_RECOGNITION_UNSUPPORTED);
            }
            RecognitionErrorKind::Aborted => {
                self.view.set_status(messages::STATUS_LISTENING_STOPPED);
            }
            RecognitionErrorKind::NotAllowed => {
                self.view.set_status(messages::STATUS_PERMISSION_DENIED);
                self.narrate(messages::SAY_RETRY);
            }
            RecognitionErrorKind::NoSpeech | RecognitionErrorKind::Network => {
                self.view
                    .set_status(messages::status_recognition_error(kind.code()));
                self.narrate(messages::SAY_RETRY);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/assistant_tests.rs"]
mod tests;
