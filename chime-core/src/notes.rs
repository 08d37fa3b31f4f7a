//! Note table
//!
//! The chime has 24 tuned tubes covering two chromatic octaves. Each tube
//! is struck by the solenoid on the channel with the same index.

/// Number of tuned channels on the standard chime
pub const NOTE_COUNT: usize = 24;

/// Tuned chime notes, two chromatic octaves from C1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Note {
    C1 = 0,
    Cs1,
    D1,
    Eb1,
    E1,
    F1,
    Fs1,
    G1,
    Gs1,
    A1,
    As1,
    B1,
    C2,
    Cs2,
    D2,
    Eb2,
    E2,
    F2,
    Fs2,
    G2,
    Gs2,
    A2,
    As2,
    B2,
}

impl Note {
    /// Default note for the press chime
    pub const DING: Note = Note::C2;

    /// Default note for the release chime
    pub const DONG: Note = Note::G2;

    /// Solenoid channel that strikes this note
    pub const fn channel(self) -> u8 {
        self as u8
    }

    /// Note struck by `channel`, if it is one of the tuned channels
    pub fn from_channel(channel: u8) -> Option<Note> {
        NOTES.get(usize::from(channel)).copied()
    }
}

const NOTES: [Note; NOTE_COUNT] = [
    Note::C1,
    Note::Cs1,
    Note::D1,
    Note::Eb1,
    Note::E1,
    Note::F1,
    Note::Fs1,
    Note::G1,
    Note::Gs1,
    Note::A1,
    Note::As1,
    Note::B1,
    Note::C2,
    Note::Cs2,
    Note::D2,
    Note::Eb2,
    Note::E2,
    Note::F2,
    Note::Fs2,
    Note::G2,
    Note::Gs2,
    Note::A2,
    Note::As2,
    Note::B2,
];
