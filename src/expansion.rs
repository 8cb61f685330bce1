use crate::config::ReplacementConfig;
use crate::error::Result;
use crate::keyboard::KeySynth;
use std::thread;
use std::time::Duration;

/// Delays applied around the delete-then-retype sequence.
#[derive(Debug, Clone)]
pub struct ReplacementTiming {
    pub pre_backspace: Duration,
    pub post_backspace: Duration,
    pub per_character: Duration,
}

impl ReplacementTiming {
    pub fn from_config(config: &ReplacementConfig) -> Self {
        ReplacementTiming {
            pre_backspace: Duration::from_millis(config.pre_backspace_delay_ms),
            post_backspace: Duration::from_millis(config.post_backspace_delay_ms),
            per_character: Duration::from_millis(config.per_character_delay_ms),
        }
    }

    #[cfg(test)]
    pub fn zero() -> Self {
        ReplacementTiming {
            pre_backspace: Duration::ZERO,
            post_backspace: Duration::ZERO,
            per_character: Duration::ZERO,
        }
    }
}

/// Erase the typed abbreviation and retype its expansion.
///
/// The sequence is strictly ordered and blocks the calling thread for its
/// full duration: wait, `to_delete` backspaces, wait, then one press/release
/// pair per expansion character with an optional delay between characters.
/// `to_delete` is the number of characters actually typed and being erased.
pub fn replace_text(
    synth: &mut impl KeySynth,
    timing: &ReplacementTiming,
    to_delete: usize,
    replacement: &str,
) -> Result<()> {
    thread::sleep(timing.pre_backspace);
    for _ in 0..to_delete {
        synth.backspace()?;
    }

    thread::sleep(timing.post_backspace);
    for c in replacement.chars() {
        synth.character(c)?;
        if !timing.per_character.is_zero() {
            thread::sleep(timing.per_character);
        }
    }

    Ok(())
}
