//! Async driver around the `Assistant`: events are applied strictly one at a
//! time on the runtime task, service calls run as spawned tasks that post
//! their results back as events.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::{
    assistant::{Assistant, AssistantEvent, ServiceCommand, UiAction},
    speech::{RecognitionEvent, SynthesisEvent},
    view::ViewModel,
    CatalogService, CommandInterpreter,
};

const VIEW_BROADCAST_CAPACITY: usize = 64;

#[derive(Debug)]
enum RuntimeMessage {
    Event(AssistantEvent),
    Shutdown,
}

#[derive(Debug, Error)]
#[error("assistant runtime is no longer running")]
pub struct RuntimeClosed;

/// Cloneable sender used by speech devices and service tasks to report back.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<RuntimeMessage>,
}

impl EventSender {
    pub fn post(&self, event: AssistantEvent) -> Result<(), RuntimeClosed> {
        self.tx
            .send(RuntimeMessage::Event(event))
            .map_err(|_| RuntimeClosed)
    }

    pub fn post_recognition(&self, event: RecognitionEvent) -> Result<(), RuntimeClosed> {
        self.post(AssistantEvent::Recognition(event))
    }

    pub fn post_synthesis(&self, event: SynthesisEvent) -> Result<(), RuntimeClosed> {
        self.post(AssistantEvent::Synthesis(event))
    }
}

pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<RuntimeMessage>,
}

pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Entry points for the UI layer.
#[derive(Debug, Clone)]
pub struct AssistantHandle {
    events: EventSender,
}

impl AssistantHandle {
    pub fn send(&self, action: UiAction) -> Result<(), RuntimeClosed> {
        self.events.post(AssistantEvent::Ui(action))
    }

    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    pub fn shutdown(&self) -> Result<(), RuntimeClosed> {
        self.events
            .tx
            .send(RuntimeMessage::Shutdown)
            .map_err(|_| RuntimeClosed)
    }
}

pub struct AssistantRuntime {
    assistant: Assistant,
    catalog: Arc<dyn CatalogService>,
    interpreter: Arc<dyn CommandInterpreter>,
    events: EventSender,
    inbox: EventReceiver,
    views: broadcast::Sender<ViewModel>,
}

impl AssistantRuntime {
    pub fn new(
        assistant: Assistant,
        catalog: Arc<dyn CatalogService>,
        interpreter: Arc<dyn CommandInterpreter>,
        (events, inbox): (EventSender, EventReceiver),
    ) -> Self {
        let (views, _) = broadcast::channel(VIEW_BROADCAST_CAPACITY);
        Self {
            assistant,
            catalog,
            interpreter,
            events,
            inbox,
            views,
        }
    }

    pub fn handle(&self) -> AssistantHandle {
        AssistantHandle {
            events: self.events.clone(),
        }
    }

    pub fn subscribe_views(&self) -> broadcast::Receiver<ViewModel> {
        self.views.subscribe()
    }

    /// Runs until `AssistantHandle::shutdown` and returns the final state.
    pub async fn run(mut self) -> Assistant {
        info!("assistant runtime started");
        self.assistant.start();
        self.flush();

        while let Some(message) = self.inbox.rx.recv().await {
            match message {
                RuntimeMessage::Event(event) => {
                    self.assistant.handle(event);
                    self.flush();
                }
                RuntimeMessage::Shutdown => break,
            }
        }

        info!("assistant runtime stopped");
        self.assistant
    }

    fn flush(&mut self) {
        for command in self.assistant.take_commands() {
            self.spawn_command(command);
        }
        // No subscribers is fine; the view is rebuilt on every event.
        let _ = self.views.send(self.assistant.render());
    }

    fn spawn_command(&self, command: ServiceCommand) {
        let events = self.events.clone();
        match command {
            ServiceCommand::FetchRecipeList { ticket, filter } => {
                let catalog = Arc::clone(&self.catalog);
                tokio::spawn(async move {
                    let result = catalog.list_recipes(&filter).await;
                    if events
                        .post(AssistantEvent::RecipeListFetched { ticket, result })
                        .is_err()
                    {
                        debug!(seq = ticket.seq, "runtime gone; recipe list dropped");
                    }
                });
            }
            ServiceCommand::FetchRecipe { ticket, id } => {
                let catalog = Arc::clone(&self.catalog);
                tokio::spawn(async move {
                    let result = catalog.get_recipe(id).await;
                    if events
                        .post(AssistantEvent::RecipeFetched { ticket, result })
                        .is_err()
                    {
                        debug!(seq = ticket.seq, "runtime gone; recipe dropped");
                    }
                });
            }
            ServiceCommand::Interpret { ticket, request } => {
                let interpreter = Arc::clone(&self.interpreter);
                tokio::spawn(async move {
                    let result = interpreter.interpret(request).await;
                    if events
                        .post(AssistantEvent::CommandInterpreted { ticket, result })
                        .is_err()
                    {
                        debug!(seq = ticket.seq, "runtime gone; interpreter reply dropped");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
