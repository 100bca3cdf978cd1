//! Terminal stand-ins for the speech devices: narration is printed, and typed
//! lines are "heard" the next time listening starts.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use assistant_core::{
    speech::{
        ListenSession, RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
        UtteranceId,
    },
    EventSender, RecognitionErrorKind, RecognitionStartError,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const PACE_PER_WORD: Duration = Duration::from_millis(120);
const MAX_UTTERANCE: Duration = Duration::from_secs(4);

fn speaking_time(text: &str) -> Duration {
    let words = text.split_whitespace().count() as u32;
    (PACE_PER_WORD * words).min(MAX_UTTERANCE)
}

pub struct ConsoleSynthesizer {
    events: EventSender,
    voice_lang: String,
    playing: Option<JoinHandle<()>>,
}

impl ConsoleSynthesizer {
    pub fn new(events: EventSender, voice_lang: String) -> Self {
        Self {
            events,
            voice_lang,
            playing: None,
        }
    }
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, utterance: UtteranceId, text: &str) {
        println!("assistant> {text}");
        debug!(utterance = utterance.0, lang = %self.voice_lang, "speaking");
        let events = self.events.clone();
        let duration = speaking_time(text);
        self.playing = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if events
                .post_synthesis(SynthesisEvent::Finished { utterance })
                .is_err()
            {
                debug!(utterance = utterance.0, "runtime gone before narration finished");
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(playing) = self.playing.take() {
            playing.abort();
        }
    }
}

/// Latest typed phrase waiting to be picked up by the recognizer.
#[derive(Clone, Default)]
pub struct PendingPhrase {
    inner: Arc<Mutex<Option<String>>>,
}

impl PendingPhrase {
    pub fn replace(&self, phrase: String) {
        match self.inner.lock() {
            Ok(mut slot) => *slot = Some(phrase),
            Err(_) => warn!("phrase slot poisoned; input dropped"),
        }
    }

    fn take(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|mut slot| slot.take())
    }
}

pub struct ConsoleRecognizer {
    events: EventSender,
    pending: PendingPhrase,
}

impl ConsoleRecognizer {
    pub fn new(events: EventSender, pending: PendingPhrase) -> Self {
        Self { events, pending }
    }

    fn report(&self, event: RecognitionEvent) -> Result<(), RecognitionStartError> {
        self.events
            .post_recognition(event)
            .map_err(|err| RecognitionStartError::Device(err.to_string()))
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn start(&mut self, session: ListenSession) -> Result<(), RecognitionStartError> {
        match self.pending.take() {
            Some(text) => self.report(RecognitionEvent::Transcript { session, text })?,
            None => self.report(RecognitionEvent::Failed {
                session,
                kind: RecognitionErrorKind::NoSpeech,
            })?,
        }
        self.report(RecognitionEvent::Ended { session })
    }

    fn abort(&mut self) {
        self.pending.take();
    }
}
