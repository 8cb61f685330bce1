//! End-to-end flow over the public API: classified key events in, synthetic
//! key operations out.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use texpand::dictionary::parse_dictionary;
use texpand::engine::ExpansionEngine;
use texpand::keyboard::KeyEvent;
use texpand::{Config, DictionaryHandle, KeySynth, Result, Suggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Backspace,
    Character(char),
}

/// `KeySynth` fake whose operation log is shared with the test body.
#[derive(Clone, Default)]
struct Recorder {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl KeySynth for Recorder {
    fn backspace(&mut self) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Backspace);
        Ok(())
    }

    fn character(&mut self, c: char) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Character(c));
        Ok(())
    }
}

fn zero_delay_config(max_buffer: usize) -> Config {
    let mut config = Config::default();
    config.max_buffer = max_buffer;
    config.replacement.pre_backspace_delay_ms = 0;
    config.replacement.post_backspace_delay_ms = 0;
    config.replacement.per_character_delay_ms = 0;
    config
}

fn engine_for(dict: &str, max_buffer: usize) -> (ExpansionEngine<Recorder>, Recorder) {
    let recorder = Recorder::default();
    let engine = ExpansionEngine::new(
        &zero_delay_config(max_buffer),
        DictionaryHandle::new(parse_dictionary(dict)),
        Path::new("/nonexistent/dictionary.txt").to_path_buf(),
        recorder.clone(),
    );
    (engine, recorder)
}

fn type_str(engine: &mut ExpansionEngine<Recorder>, s: &str) {
    for c in s.chars() {
        engine.handle_event(KeyEvent::Character(c));
    }
}

#[test]
fn typed_abbreviation_is_replaced_on_accept() {
    let (mut engine, recorder) = engine_for("brb=be right back\nomw=on my way", 20);

    type_str(&mut engine, "brb");
    assert_eq!(
        engine.suggestion(),
        &Suggestion::Active {
            expansion: "be right back".to_string(),
            matched_len: 3,
        }
    );

    engine.handle_event(KeyEvent::Accept);

    let ops = recorder.ops.lock().unwrap();
    assert_eq!(ops.len(), 3 + "be right back".len());
    assert!(ops[..3].iter().all(|op| *op == Op::Backspace));
    let typed: String = ops[3..]
        .iter()
        .map(|op| match op {
            Op::Character(c) => *c,
            Op::Backspace => panic!("backspace after typing started"),
        })
        .collect();
    assert_eq!(typed, "be right back");

    assert_eq!(engine.buffer_contents(), "");
    assert_eq!(engine.suggestion(), &Suggestion::Inactive);
}

#[test]
fn word_boundaries_cancel_a_pending_match() {
    let (mut engine, recorder) = engine_for("omw=on my way", 20);

    type_str(&mut engine, "omw");
    assert!(engine.suggestion().is_active());

    engine.handle_event(KeyEvent::Space);
    assert_eq!(engine.suggestion(), &Suggestion::Inactive);

    // Accept after the boundary must emit nothing.
    engine.handle_event(KeyEvent::Accept);
    assert!(recorder.ops.lock().unwrap().is_empty());
    assert_eq!(engine.buffer_contents(), "");
}

#[test]
fn hot_reload_picks_up_new_entries_mid_stream() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "brb=be right back").unwrap();

    let handle = DictionaryHandle::new(texpand::load_dictionary(file.path()).unwrap());
    let mut engine = ExpansionEngine::new(
        &zero_delay_config(20),
        handle.clone(),
        file.path().to_path_buf(),
        Recorder::default(),
    );

    type_str(&mut engine, "omw");
    assert_eq!(engine.suggestion(), &Suggestion::Inactive);

    writeln!(file, "omw=on my way").unwrap();
    file.flush().unwrap();
    engine.handle_event(KeyEvent::ReloadCombo);

    // The buffer survives the reload; the next character re-matches against
    // the fresh snapshot.
    assert_eq!(engine.buffer_contents(), "omw");
    engine.handle_event(KeyEvent::Backspace);
    engine.handle_event(KeyEvent::Character('w'));
    assert_eq!(
        engine.suggestion(),
        &Suggestion::Active {
            expansion: "on my way".to_string(),
            matched_len: 3,
        }
    );
}
