//! Tune library
//!
//! Tunes come from the config file, either as raw tune files in the
//! byte-record format or as inline `[delay_ms, channel]` pairs. When none
//! load, the built-in tunes are used.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use chime_core::config::ChimeConfig;
use chime_core::notes::{Note, NOTE_COUNT};
use chime_core::selection::MAX_TUNES;
use chime_core::sequence::{compile, ActionSequence, SequenceError, RECORD_LEN};

use crate::config::TuneEntry;

/// Gap between notes of the built-in scale
const SCALE_STEP_MS: u16 = 512;

/// Opening phrase played by the second built-in tune
const PHRASE: [(u16, Note); 10] = [
    (0, Note::D1),
    (512, Note::D1),
    (512, Note::A1),
    (512, Note::A1),
    (256, Note::B1),
    (256, Note::Cs2),
    (256, Note::D2),
    (256, Note::E2),
    (256, Note::Cs2),
    (256, Note::B1),
];

/// Errors that can occur when loading a tune
#[derive(Debug, Error)]
pub enum TuneError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("tune has more than {} actions", chime_core::sequence::MAX_ACTIONS)]
    TooLong,
    #[error("tune has no notes")]
    Empty,
    #[error("tune sets both a file and inline notes")]
    Ambiguous,
}

impl From<SequenceError> for TuneError {
    fn from(e: SequenceError) -> Self {
        match e {
            SequenceError::TooManyActions => TuneError::TooLong,
        }
    }
}

/// Encode `(delay_ms, channel)` records into tune bytes
pub fn encode_records(records: &[(u16, u8)]) -> Vec<u8> {
    let mut data = vec![0; records.len() * RECORD_LEN];
    // Sized to fit
    let _ = chime_core::sequence::encode(records, &mut data);
    data
}

/// Compile records into a sequence for `config`
pub fn from_records(
    records: &[(u16, u8)],
    config: &ChimeConfig,
) -> Result<ActionSequence, TuneError> {
    let actions = compile(config.channel_count(), &encode_records(records), config.pulse())?;
    if actions.is_empty() {
        return Err(TuneError::Empty);
    }
    Ok(actions)
}

/// Load one configured tune
///
/// Relative file paths are resolved against `base`.
pub fn load(
    entry: &TuneEntry,
    base: &Path,
    config: &ChimeConfig,
) -> Result<ActionSequence, TuneError> {
    match (&entry.path, entry.notes.is_empty()) {
        (Some(_), false) => Err(TuneError::Ambiguous),
        (Some(path), true) => {
            let path = base.join(path);
            let data = fs::read(&path).map_err(|source| TuneError::Io { path, source })?;
            let actions = compile(config.channel_count(), &data, config.pulse())?;
            if actions.is_empty() {
                return Err(TuneError::Empty);
            }
            Ok(actions)
        }
        (None, _) => from_records(&entry.notes, config),
    }
}

/// Load every configured tune, falling back to the built-in ones
///
/// Tunes that fail to load are skipped with a warning.
pub fn load_all(entries: &[TuneEntry], base: &Path, config: &ChimeConfig) -> Vec<ActionSequence> {
    if entries.len() > MAX_TUNES {
        warn!(
            configured = entries.len(),
            max = MAX_TUNES,
            "too many tunes, ignoring the rest"
        );
    }

    let mut tunes = Vec::new();
    for entry in entries.iter().take(MAX_TUNES) {
        match load(entry, base, config) {
            Ok(actions) => {
                info!(tune = %entry.name, actions = actions.len(), "loaded tune");
                tunes.push(actions);
            }
            Err(e) => warn!(tune = %entry.name, error = %e, "skipping tune"),
        }
    }

    if tunes.is_empty() {
        info!("no tunes configured, using built-in tunes");
        tunes = builtin(config);
    }
    tunes
}

/// Built-in tunes: a rising scale and a short phrase
///
/// Notes beyond the configured channel count are dropped by the compiler.
pub fn builtin(config: &ChimeConfig) -> Vec<ActionSequence> {
    let scale: Vec<(u16, u8)> = (0..NOTE_COUNT as u8)
        .map(|channel| (if channel == 0 { 0 } else { SCALE_STEP_MS }, channel))
        .collect();
    let phrase: Vec<(u16, u8)> = PHRASE
        .iter()
        .map(|&(delay, note)| (delay, note.channel()))
        .collect();

    [scale, phrase]
        .iter()
        .filter_map(|records| match from_records(records, config) {
            Ok(actions) => Some(actions),
            Err(e) => {
                warn!(error = %e, "built-in tune unusable");
                None
            }
        })
        .collect()
}
