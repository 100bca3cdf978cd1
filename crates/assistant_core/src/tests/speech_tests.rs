use super::*;
use crate::{
    error::{RecognitionErrorKind, RecognitionStartError},
    testing::{RecordingSynthesizer, ScriptedRecognizer},
};

fn ready_gate() -> ActivationGate {
    ActivationGate {
        is_speaking: false,
        has_recipe: true,
        command_in_flight: false,
    }
}

#[test]
fn say_replaces_narration_in_progress() {
    let synth = RecordingSynthesizer::default();
    let mut output = SpeechOutputChannel::new(Box::new(synth.clone()));

    let first = output.say("first");
    let second = output.say("second");

    assert_eq!(first, SayOutcome::Speaking(UtteranceId(1)));
    assert_eq!(second, SayOutcome::Speaking(UtteranceId(2)));
    assert_eq!(synth.cancels(), 1);
    assert_eq!(synth.spoken(), vec!["first", "second"]);
    assert!(output.is_speaking());
}

#[test]
fn completion_of_replaced_utterance_is_stale() {
    let mut output = SpeechOutputChannel::new(Box::new(RecordingSynthesizer::default()));
    output.say("first");
    output.say("second");

    let stale = output.on_event(SynthesisEvent::Finished {
        utterance: UtteranceId(1),
    });
    assert_eq!(stale, SpeechCompletion::Stale);
    assert!(output.is_speaking());

    let done = output.on_event(SynthesisEvent::Finished {
        utterance: UtteranceId(2),
    });
    assert_eq!(done, SpeechCompletion::Completed);
    assert!(!output.is_speaking());
}

#[test]
fn synthesis_failure_returns_to_idle() {
    let mut output = SpeechOutputChannel::new(Box::new(RecordingSynthesizer::default()));
    output.say("hello");

    let failed = output.on_event(SynthesisEvent::Failed {
        utterance: UtteranceId(1),
        reason: "audio device lost".into(),
    });
    assert_eq!(failed, SpeechCompletion::Failed("audio device lost".into()));
    assert!(!output.is_speaking());
}

#[test]
fn cancel_reports_whether_anything_was_cut_off() {
    let synth = RecordingSynthesizer::default();
    let mut output = SpeechOutputChannel::new(Box::new(synth.clone()));
    assert!(!output.cancel());
    assert_eq!(synth.cancels(), 0);

    output.say("hello");
    assert!(output.cancel());
    assert!(!output.is_speaking());
    assert_eq!(synth.cancels(), 1);
}

#[test]
fn unsupported_synthesizer_never_speaks() {
    let synth = RecordingSynthesizer::unsupported();
    let mut output = SpeechOutputChannel::new(Box::new(synth.clone()));

    assert_eq!(output.say("hello"), SayOutcome::Unsupported);
    assert!(!output.is_speaking());
    assert!(synth.spoken().is_empty());
}

#[test]
fn transcript_is_released_only_on_end() {
    let recognizer = ScriptedRecognizer::default();
    let mut input = SpeechInputChannel::new(Box::new(recognizer.clone()));

    let session = input.activate(ready_gate()).expect("listening");
    assert!(input.is_listening());
    assert_eq!(recognizer.starts(), vec![session]);

    let pending = input.on_event(RecognitionEvent::Transcript {
        session,
        text: "next step".into(),
    });
    assert_eq!(pending, None);
    assert!(input.is_listening());

    let outcome = input.on_event(RecognitionEvent::Ended { session });
    assert_eq!(outcome, Some(RecognitionOutcome::Transcript("next step".into())));
    assert!(!input.is_listening());
}

#[test]
fn first_terminal_result_wins() {
    let mut input = SpeechInputChannel::new(Box::new(ScriptedRecognizer::default()));
    let session = input.activate(ready_gate()).expect("listening");

    input.on_event(RecognitionEvent::Failed {
        session,
        kind: RecognitionErrorKind::NoSpeech,
    });
    input.on_event(RecognitionEvent::Transcript {
        session,
        text: "too late".into(),
    });

    assert_eq!(
        input.on_event(RecognitionEvent::Ended { session }),
        Some(RecognitionOutcome::Failed(RecognitionErrorKind::NoSpeech))
    );
    assert!(!input.is_disabled());
}

#[test]
fn end_without_result_yields_no_result() {
    let mut input = SpeechInputChannel::new(Box::new(ScriptedRecognizer::default()));
    let session = input.activate(ready_gate()).expect("listening");

    assert_eq!(
        input.on_event(RecognitionEvent::Ended { session }),
        Some(RecognitionOutcome::NoResult)
    );
}

#[test]
fn activation_refusals_follow_gate() {
    let mut input = SpeechInputChannel::new(Box::new(ScriptedRecognizer::default()));

    let speaking = ActivationGate {
        is_speaking: true,
        ..ready_gate()
    };
    let no_recipe = ActivationGate {
        has_recipe: false,
        ..ready_gate()
    };
    let busy = ActivationGate {
        command_in_flight: true,
        ..ready_gate()
    };
    assert_eq!(input.activate(speaking), Err(ActivationRefusal::Speaking));
    assert_eq!(input.activate(no_recipe), Err(ActivationRefusal::NoRecipe));
    assert_eq!(input.activate(busy), Err(ActivationRefusal::CommandInFlight));

    input.activate(ready_gate()).expect("listening");
    assert_eq!(
        input.activate(ready_gate()),
        Err(ActivationRefusal::AlreadyListening)
    );
}

#[test]
fn aborted_session_ignores_late_events() {
    let recognizer = ScriptedRecognizer::default();
    let mut input = SpeechInputChannel::new(Box::new(recognizer.clone()));
    let session = input.activate(ready_gate()).expect("listening");

    assert!(input.abort());
    assert_eq!(recognizer.aborts(), 1);
    assert!(!input.is_listening());

    assert_eq!(
        input.on_event(RecognitionEvent::Transcript {
            session,
            text: "late".into(),
        }),
        None
    );
    assert_eq!(input.on_event(RecognitionEvent::Ended { session }), None);
    assert!(!input.abort());
}

#[test]
fn unsupported_recognizer_starts_disabled() {
    let mut input = SpeechInputChannel::new(Box::new(ScriptedRecognizer::unsupported()));
    assert!(input.is_disabled());
    assert_eq!(input.activate(ready_gate()), Err(ActivationRefusal::Disabled));
}

#[test]
fn unsupported_error_disables_input_for_good() {
    let mut input = SpeechInputChannel::new(Box::new(ScriptedRecognizer::default()));
    let session = input.activate(ready_gate()).expect("listening");

    input.on_event(RecognitionEvent::Failed {
        session,
        kind: RecognitionErrorKind::Unsupported,
    });
    input.on_event(RecognitionEvent::Ended { session });

    assert!(input.is_disabled());
    assert_eq!(input.activate(ready_gate()), Err(ActivationRefusal::Disabled));
}

#[test]
fn start_failures_are_reported() {
    let recognizer = ScriptedRecognizer::default();
    let mut input = SpeechInputChannel::new(Box::new(recognizer.clone()));

    recognizer.fail_next_start(RecognitionStartError::Device("microphone busy".into()));
    assert_eq!(
        input.activate(ready_gate()),
        Err(ActivationRefusal::StartFailed("microphone busy".into()))
    );
    assert!(!input.is_disabled());

    recognizer.fail_next_start(RecognitionStartError::Unsupported);
    assert_eq!(input.activate(ready_gate()), Err(ActivationRefusal::Disabled));
    assert!(input.is_disabled());
}

#[test]
fn recognition_codes_parse() {
    assert_eq!(
        "no-speech".parse::<RecognitionErrorKind>(),
        Ok(RecognitionErrorKind::NoSpeech)
    );
    assert_eq!(
        "service-not-allowed".parse::<RecognitionErrorKind>(),
        Ok(RecognitionErrorKind::NotAllowed)
    );
    assert!("audio-capture".parse::<RecognitionErrorKind>().is_err());
    assert_eq!(RecognitionErrorKind::Network.to_string(), "network");
}
