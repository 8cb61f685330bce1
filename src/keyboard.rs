use crate::error::{Result, TexpandError};
use enigo::Keyboard;
use enigo::{Direction, Enigo, Key, Settings};
use rdev::{self, EventType, Key as RdevKey};

/// A key press classified once at the input boundary. Downstream code never
/// inspects raw OS events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Character(char),
    Backspace,
    Space,
    Enter,
    Accept,
    ReloadCombo,
    Other,
}

/// Tracks held modifier state across press/release events so the reload
/// combination (Ctrl+Alt+R) can be detected on a plain key-press stream.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    ctrl: bool,
    alt: bool,
}

impl ModifierTracker {
    pub fn observe(&mut self, event: &rdev::Event) {
        let (key, pressed) = match event.event_type {
            EventType::KeyPress(key) => (key, true),
            EventType::KeyRelease(key) => (key, false),
            _ => return,
        };
        match key {
            RdevKey::ControlLeft | RdevKey::ControlRight => self.ctrl = pressed,
            RdevKey::Alt | RdevKey::AltGr => self.alt = pressed,
            _ => {}
        }
    }

    pub fn reload_combo_held(&self) -> bool {
        self.ctrl && self.alt
    }
}

/// Classify a raw hook event. Returns `None` for everything that is not a
/// key press; a press with no associated character classifies as `Other`.
pub fn classify(
    event: &rdev::Event,
    accept_key: RdevKey,
    mods: &ModifierTracker,
) -> Option<KeyEvent> {
    let key = match event.event_type {
        EventType::KeyPress(key) => key,
        _ => return None,
    };

    if key == accept_key {
        return Some(KeyEvent::Accept);
    }
    if key == RdevKey::KeyR && mods.reload_combo_held() {
        return Some(KeyEvent::ReloadCombo);
    }

    Some(match key {
        RdevKey::Backspace => KeyEvent::Backspace,
        RdevKey::Space => KeyEvent::Space,
        RdevKey::Return | RdevKey::KpReturn => KeyEvent::Enter,
        _ => match key_event_char(event) {
            Some(c) => KeyEvent::Character(c),
            None => KeyEvent::Other,
        },
    })
}

/// Extract the typed character from a hook event, if the OS associated one
/// with it. Modifiers, arrows and function keys carry no single-character
/// name and yield `None`.
pub fn key_event_char(event: &rdev::Event) -> Option<char> {
    let name = event.name.as_ref()?;
    let mut chars = name.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(c)
}

/// Resolve a named key from the config file to an `rdev` key.
pub fn parse_key_name(name: &str) -> Option<RdevKey> {
    let key = match name.trim().to_lowercase().as_str() {
        "f1" => RdevKey::F1,
        "f2" => RdevKey::F2,
        "f3" => RdevKey::F3,
        "f4" => RdevKey::F4,
        "f5" => RdevKey::F5,
        "f6" => RdevKey::F6,
        "f7" => RdevKey::F7,
        "f8" => RdevKey::F8,
        "f9" => RdevKey::F9,
        "f10" => RdevKey::F10,
        "f11" => RdevKey::F11,
        "f12" => RdevKey::F12,
        "tab" => RdevKey::Tab,
        "insert" => RdevKey::Insert,
        "home" => RdevKey::Home,
        "end" => RdevKey::End,
        _ => return None,
    };
    Some(key)
}

/// Press-and-release primitive the replacement protocol is written against.
/// The production implementation drives `enigo`; tests substitute a
/// recording fake.
pub trait KeySynth {
    fn backspace(&mut self) -> Result<()>;
    fn character(&mut self, c: char) -> Result<()>;
}

/// `enigo`-backed key synthesis.
pub struct EnigoSynth {
    enigo: Enigo,
}

impl EnigoSynth {
    pub fn new() -> Result<Self> {
        let settings = Settings::default();
        match Enigo::new(&settings) {
            Ok(enigo) => Ok(EnigoSynth { enigo }),
            Err(err) => Err(TexpandError::Enigo(format!(
                "Failed to create keyboard controller: {}",
                err
            ))),
        }
    }
}

impl KeySynth for EnigoSynth {
    fn backspace(&mut self) -> Result<()> {
        self.enigo
            .key(Key::Backspace, Direction::Click)
            .map_err(|err| TexpandError::Enigo(format!("Failed to send backspace: {}", err)))
    }

    fn character(&mut self, c: char) -> Result<()> {
        self.enigo
            .key(Key::Unicode(c), Direction::Click)
            .map_err(|err| TexpandError::Enigo(format!("Failed to type character: {}", err)))
    }
}
