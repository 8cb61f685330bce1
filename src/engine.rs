use crate::config::Config;
use crate::dictionary::DictionaryHandle;
use crate::expansion::{replace_text, ReplacementTiming};
use crate::keyboard::{KeyEvent, KeySynth};
use crate::matcher::{longest_suffix_match, InputBuffer, Suggestion};
use std::path::PathBuf;

/// The key-event router. Owns the trailing buffer and suggestion state and
/// mutates them exclusively on the event-processing thread; the dictionary
/// is read through per-event snapshots.
pub struct ExpansionEngine<S: KeySynth> {
    buffer: InputBuffer,
    suggestion: Suggestion,
    dictionary: DictionaryHandle,
    dictionary_path: PathBuf,
    timing: ReplacementTiming,
    synth: S,
}

impl<S: KeySynth> ExpansionEngine<S> {
    pub fn new(
        config: &Config,
        dictionary: DictionaryHandle,
        dictionary_path: PathBuf,
        synth: S,
    ) -> Self {
        ExpansionEngine {
            buffer: InputBuffer::new(config.max_buffer),
            suggestion: Suggestion::Inactive,
            dictionary,
            dictionary_path,
            timing: ReplacementTiming::from_config(&config.replacement),
            synth,
        }
    }

    /// Process one classified key event. Never panics and never propagates
    /// an error: once the event loop is running, failures are logged and the
    /// state machine keeps going.
    pub fn handle_event(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Accept => self.on_accept(),
            KeyEvent::Character(c) if c.is_alphanumeric() => self.on_character(c),
            // Punctuation and other printable non-alphanumerics are word
            // boundaries, same as space and enter.
            KeyEvent::Character(_) | KeyEvent::Space | KeyEvent::Enter => self.reset(),
            KeyEvent::Backspace => self.on_backspace(),
            KeyEvent::ReloadCombo => self.on_reload(),
            KeyEvent::Other => {}
        }
    }

    fn on_character(&mut self, c: char) {
        let c = c.to_lowercase().next().unwrap_or(c);
        self.buffer.push(c);
        self.rematch();
    }

    fn on_backspace(&mut self) {
        // A shorter buffer may still end in a shorter dictionary key, so the
        // lookup is re-run rather than just dropping the suggestion.
        self.buffer.backspace();
        self.rematch();
    }

    fn on_accept(&mut self) {
        let Suggestion::Active { expansion, .. } = std::mem::replace(
            &mut self.suggestion,
            Suggestion::Inactive,
        ) else {
            // No active suggestion: the accept key is a plain keystroke.
            return;
        };

        // Erase everything that was typed into the buffer, not just the
        // matched key length.
        let to_delete = self.buffer.len();
        if let Err(e) = replace_text(&mut self.synth, &self.timing, to_delete, &expansion) {
            tracing::warn!("replacement failed: {}", e);
        }
        self.buffer.clear();
    }

    fn on_reload(&mut self) {
        match self.dictionary.reload(&self.dictionary_path) {
            Ok(count) => tracing::info!("dictionary reloaded: {} entries", count),
            Err(e) => tracing::warn!("dictionary reload failed, keeping previous: {}", e),
        }
    }

    fn rematch(&mut self) {
        let snapshot = self.dictionary.snapshot();
        self.suggestion = longest_suffix_match(&self.buffer, &snapshot);
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.suggestion = Suggestion::Inactive;
    }

    pub fn suggestion(&self) -> &Suggestion {
        &self.suggestion
    }

    pub fn buffer_contents(&self) -> String {
        self.buffer.contents()
    }
}
