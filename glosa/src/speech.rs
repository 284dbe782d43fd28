//! Speech output contract
//!
//! Audio playback is owned by the host platform. The core only decides what
//! to say and in which locale, then hands both to a `SpeechOutput`.

use crate::interface::{Language, Term};
use std::sync::Arc;

/// Implemented by the host (e.g. a platform TTS engine). Fire and forget.
#[uniffi::export(with_foreign)]
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, locale: String, text: String);
}

/// What a `SpeechOutput` is asked to pronounce
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct SpeechRequest {
    pub locale: String,
    pub text: String,
}

/// Build the request for `term` in `language`, or `None` if that translation is blank
pub fn speech_request(term: &Term, language: Language) -> Option<SpeechRequest> {
    let text = term.text_for(language).trim();
    if text.is_empty() {
        return None;
    }
    Some(SpeechRequest {
        locale: language.speech_locale().to_string(),
        text: text.to_string(),
    })
}

/// Speak `term` in `language`. Returns false when there was nothing to say.
#[uniffi::export]
pub fn pronounce(term: Term, language: Language, output: Arc<dyn SpeechOutput>) -> bool {
    match speech_request(&term, language) {
        Some(request) => {
            tracing::debug!(locale = %request.locale, id = %term.id, "pronouncing term");
            output.speak(request.locale, request.text);
            true
        }
        None => false,
    }
}
