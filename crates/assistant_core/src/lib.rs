use async_trait::async_trait;
use shared::{
    domain::{FilterCategory, Recipe, RecipeId, RecipeSummary},
    protocol::{InterpretRequest, InterpretResponse},
};

mod assistant;
mod dispatcher;
pub mod error;
pub mod messages;
mod navigation;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use assistant::{Assistant, AssistantEvent, RequestTicket, ServiceCommand, UiAction};
pub use dispatcher::CommandDispatcher;
pub use error::{
    AssistantError, CatalogError, FetchTarget, InterpreterError, RecognitionErrorKind,
    RecognitionStartError,
};
pub use runtime::{
    event_channel, AssistantHandle, AssistantRuntime, EventReceiver, EventSender, RuntimeClosed,
};
pub use session::{ActiveView, SessionSnapshot, SessionState};

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_recipes(&self, filter: &FilterCategory)
        -> Result<Vec<RecipeSummary>, CatalogError>;
    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, CatalogError>;
}

#[async_trait]
pub trait CommandInterpreter: Send + Sync {
    async fn interpret(
        &self,
        request: InterpretRequest,
    ) -> Result<InterpretResponse, InterpreterError>;
}

/// Stand-in used when no interpreter is configured; every utterance fails
/// and the assistant apologises.
pub struct MissingCommandInterpreter;

#[async_trait]
impl CommandInterpreter for MissingCommandInterpreter {
    async fn interpret(
        &self,
        _request: InterpretRequest,
    ) -> Result<InterpretResponse, InterpreterError> {
        Err(InterpreterError::Transport(
            "command interpreter is unavailable".to_string(),
        ))
    }
}
