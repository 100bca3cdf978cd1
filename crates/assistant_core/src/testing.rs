//! Fake devices and services shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{FilterCategory, Ingredient, Quantity, Recipe, RecipeId, RecipeSummary},
    protocol::{InterpretRequest, InterpretResponse},
};

use crate::{
    assistant::{Assistant, AssistantEvent, RequestTicket, ServiceCommand},
    error::{CatalogError, InterpreterError, RecognitionStartError},
    runtime::EventSender,
    speech::{
        ListenSession, RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
        UtteranceId,
    },
    CatalogService, CommandInterpreter,
};

pub(crate) fn recipe(id: i64, name: &str, steps: &[&str]) -> Recipe {
    Recipe {
        id: RecipeId(id),
        name: name.to_string(),
        cuisine: Some("Continental".to_string()),
        category: Some("Vegetarian".to_string()),
        prep_time: Some(5),
        cook_time: Some(10),
        servings: Some(2),
        ingredients: vec![Ingredient {
            name: "eggs".to_string(),
            quantity: Some(Quantity::Number(2.0)),
            unit: Some("large".to_string()),
        }],
        instructions: steps.iter().map(|s| s.to_string()).collect(),
        image_url: None,
    }
}

pub(crate) fn three_step_recipe() -> Recipe {
    recipe(
        1,
        "Scrambled Eggs",
        &["Crack the eggs.", "Whisk the eggs.", "Cook gently."],
    )
}

#[derive(Debug, Default)]
struct SynthLog {
    spoken: Vec<(UtteranceId, String)>,
    cancels: usize,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingSynthesizer {
    log: Arc<Mutex<SynthLog>>,
    unsupported: bool,
}

impl RecordingSynthesizer {
    pub(crate) fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub(crate) fn spoken(&self) -> Vec<String> {
        let log = self.log.lock().expect("synth log");
        log.spoken.iter().map(|(_, text)| text.clone()).collect()
    }

    pub(crate) fn last_spoken(&self) -> Option<String> {
        self.spoken().pop()
    }

    pub(crate) fn last_utterance(&self) -> Option<UtteranceId> {
        let log = self.log.lock().expect("synth log");
        log.spoken.last().map(|(id, _)| *id)
    }

    pub(crate) fn times_spoken(&self, text: &str) -> usize {
        self.spoken().iter().filter(|s| s.as_str() == text).count()
    }

    pub(crate) fn cancels(&self) -> usize {
        self.log.lock().expect("synth log").cancels
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn speak(&mut self, utterance: UtteranceId, text: &str) {
        let mut log = self.log.lock().expect("synth log");
        log.spoken.push((utterance, text.to_string()));
    }

    fn cancel(&mut self) {
        self.log.lock().expect("synth log").cancels += 1;
    }
}

#[derive(Debug, Default)]
struct RecognizerLog {
    starts: Vec<ListenSession>,
    aborts: usize,
    start_failures: VecDeque<RecognitionStartError>,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedRecognizer {
    log: Arc<Mutex<RecognizerLog>>,
    unsupported: bool,
}

impl ScriptedRecognizer {
    pub(crate) fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub(crate) fn fail_next_start(&self, error: RecognitionStartError) {
        self.log
            .lock()
            .expect("recognizer log")
            .start_failures
            .push_back(error);
    }

    pub(crate) fn starts(&self) -> Vec<ListenSession> {
        self.log.lock().expect("recognizer log").starts.clone()
    }

    pub(crate) fn last_session(&self) -> Option<ListenSession> {
        self.starts().last().copied()
    }

    pub(crate) fn aborts(&self) -> usize {
        self.log.lock().expect("recognizer log").aborts
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn start(&mut self, session: ListenSession) -> Result<(), RecognitionStartError> {
        let mut log = self.log.lock().expect("recognizer log");
        if let Some(error) = log.start_failures.pop_front() {
            return Err(error);
        }
        log.starts.push(session);
        Ok(())
    }

    fn abort(&mut self) {
        self.log.lock().expect("recognizer log").aborts += 1;
    }
}

/// Assistant wired to recording devices, with helpers for answering the
/// requests it emits.
pub(crate) struct Harness {
    pub(crate) assistant: Assistant,
    pub(crate) synth: RecordingSynthesizer,
    pub(crate) recognizer: ScriptedRecognizer,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_devices(RecordingSynthesizer::default(), ScriptedRecognizer::default())
    }

    pub(crate) fn with_devices(synth: RecordingSynthesizer, recognizer: ScriptedRecognizer) -> Self {
        let assistant = Assistant::new(Box::new(synth.clone()), Box::new(recognizer.clone()));
        Self {
            assistant,
            synth,
            recognizer,
        }
    }

    /// Starts on the list view and answers the initial list request.
    pub(crate) fn started(recipes: Vec<RecipeSummary>) -> Self {
        let mut harness = Self::new();
        harness.assistant.start();
        harness.answer_list(Ok(recipes));
        harness
    }

    pub(crate) fn answer_list(&mut self, result: Result<Vec<RecipeSummary>, CatalogError>) {
        let ticket = self.expect_list_request().0;
        self.assistant
            .handle(AssistantEvent::RecipeListFetched { ticket, result });
    }

    pub(crate) fn expect_list_request(&mut self) -> (RequestTicket, FilterCategory) {
        let commands = self.assistant.take_commands();
        commands
            .into_iter()
            .find_map(|command| match command {
                ServiceCommand::FetchRecipeList { ticket, filter } => Some((ticket, filter)),
                _ => None,
            })
            .expect("recipe list request")
    }

    pub(crate) fn expect_recipe_request(&mut self) -> (RequestTicket, RecipeId) {
        let commands = self.assistant.take_commands();
        commands
            .into_iter()
            .find_map(|command| match command {
                ServiceCommand::FetchRecipe { ticket, id } => Some((ticket, id)),
                _ => None,
            })
            .expect("recipe request")
    }

    pub(crate) fn expect_interpret_request(&mut self) -> (RequestTicket, InterpretRequest) {
        let commands = self.assistant.take_commands();
        commands
            .into_iter()
            .find_map(|command| match command {
                ServiceCommand::Interpret { ticket, request } => Some((ticket, request)),
                _ => None,
            })
            .expect("interpret request")
    }

    /// Opens `recipe` and lets the load narration finish.
    pub(crate) fn open(&mut self, recipe: Recipe) {
        self.assistant.open_recipe(recipe.id);
        let (ticket, _) = self.expect_recipe_request();
        self.assistant.handle(AssistantEvent::RecipeFetched {
            ticket,
            result: Ok(recipe),
        });
        self.finish_speech();
    }

    pub(crate) fn finish_speech(&mut self) {
        if let Some(utterance) = self.synth.last_utterance() {
            self.assistant
                .handle(AssistantEvent::Synthesis(SynthesisEvent::Finished { utterance }));
        }
    }

    pub(crate) fn recognition(&mut self, event: RecognitionEvent) {
        self.assistant.handle(AssistantEvent::Recognition(event));
    }

    /// Activates listening and delivers `text` as the transcript.
    pub(crate) fn speak_command(&mut self, text: &str) -> (RequestTicket, InterpretRequest) {
        self.assistant.activate_listening();
        let session = self.recognizer.last_session().expect("listening started");
        self.recognition(RecognitionEvent::Transcript {
            session,
            text: text.to_string(),
        });
        self.recognition(RecognitionEvent::Ended { session });
        self.expect_interpret_request()
    }

    pub(crate) fn reply(
        &mut self,
        ticket: RequestTicket,
        result: Result<InterpretResponse, InterpreterError>,
    ) {
        self.assistant
            .handle(AssistantEvent::CommandInterpreted { ticket, result });
    }
}

pub(crate) struct InMemoryCatalog {
    recipes: Vec<Recipe>,
    list_calls: Mutex<Vec<FilterCategory>>,
}

impl InMemoryCatalog {
    pub(crate) fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            list_calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn list_calls(&self) -> Vec<FilterCategory> {
        self.list_calls.lock().expect("list calls").clone()
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn list_recipes(
        &self,
        filter: &FilterCategory,
    ) -> Result<Vec<RecipeSummary>, CatalogError> {
        self.list_calls
            .lock()
            .expect("list calls")
            .push(filter.clone());
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| {
                filter.is_all()
                    || recipe
                        .category
                        .as_deref()
                        .is_some_and(|c| FilterCategory::new(c) == *filter)
            })
            .map(Recipe::summary)
            .collect())
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, CatalogError> {
        self.recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}

#[derive(Default)]
pub(crate) struct ScriptedInterpreter {
    replies: Mutex<VecDeque<Result<InterpretResponse, InterpreterError>>>,
    requests: Mutex<Vec<InterpretRequest>>,
}

impl ScriptedInterpreter {
    pub(crate) fn with_replies(
        replies: impl IntoIterator<Item = Result<InterpretResponse, InterpreterError>>,
    ) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<InterpretRequest> {
        self.requests.lock().expect("requests").clone()
    }
}

#[async_trait]
impl CommandInterpreter for ScriptedInterpreter {
    async fn interpret(
        &self,
        request: InterpretRequest,
    ) -> Result<InterpretResponse, InterpreterError> {
        self.requests.lock().expect("requests").push(request);
        self.replies
            .lock()
            .expect("replies")
            .pop_front()
            .unwrap_or_else(|| Err(InterpreterError::Transport("no scripted reply".into())))
    }
}

/// Synthesizer that finishes every utterance immediately through the runtime.
pub(crate) struct InstantSynthesizer {
    events: EventSender,
    spoken: Arc<Mutex<Vec<String>>>,
}

impl InstantSynthesizer {
    pub(crate) fn new(events: EventSender) -> (Self, Arc<Mutex<Vec<String>>>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events,
                spoken: Arc::clone(&spoken),
            },
            spoken,
        )
    }
}

impl SpeechSynthesizer for InstantSynthesizer {
    fn speak(&mut self, utterance: UtteranceId, text: &str) {
        self.spoken.lock().expect("spoken").push(text.to_string());
        let _ = self
            .events
            .post_synthesis(SynthesisEvent::Finished { utterance });
    }

    fn cancel(&mut self) {}
}

/// Recognizer that "hears" queued phrases as soon as it is started.
pub(crate) struct QueuedRecognizer {
    events: EventSender,
    phrases: Arc<Mutex<VecDeque<String>>>,
}

impl QueuedRecognizer {
    pub(crate) fn new(events: EventSender) -> (Self, Arc<Mutex<VecDeque<String>>>) {
        let phrases = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                events,
                phrases: Arc::clone(&phrases),
            },
            phrases,
        )
    }
}

impl SpeechRecognizer for QueuedRecognizer {
    fn start(&mut self, session: ListenSession) -> Result<(), RecognitionStartError> {
        let phrase = self.phrases.lock().expect("phrases").pop_front();
        if let Some(text) = phrase {
            let _ = self
                .events
                .post_recognition(RecognitionEvent::Transcript { session, text });
        }
        let _ = self
            .events
            .post_recognition(RecognitionEvent::Ended { session });
        Ok(())
    }

    fn abort(&mut self) {}
}
