//! Host simulation board
//!
//! Console commands, one per line:
//!
//! - `p <n>`: press button `n` (held until released)
//! - `r`: release every button
//! - `m <mask>`: set the raw button lines, hex with `0x` or decimal
//! - `q`: quit

use std::convert::Infallible;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::{debug, info, warn};

use chime_core::notes::Note;
use chime_core::pins::MAX_LINES;
use chime_core::traits::{EntropyError, EntropySource};

/// Raw button lines as set from the console
static BUTTON_LINES: AtomicU32 = AtomicU32::new(0);

/// Simulated solenoid output
#[derive(Debug)]
pub struct SimOutput {
    line: usize,
    high: bool,
}

impl SimOutput {
    pub fn new(line: usize) -> Self {
        Self { line, high: false }
    }
}

impl ErrorType for SimOutput {
    type Error = Infallible;
}

impl OutputPin for SimOutput {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            let note = u8::try_from(self.line).ok().and_then(Note::from_channel);
            info!(line = self.line, ?note, "strike");
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.high {
            debug!(line = self.line, "release");
        }
        self.high = false;
        Ok(())
    }
}

/// Simulated button input, reading one console button line
#[derive(Debug)]
pub struct SimInput {
    line: usize,
}

impl SimInput {
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

impl ErrorType for SimInput {
    type Error = Infallible;
}

impl InputPin for SimInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(BUTTON_LINES.load(Ordering::Relaxed) & (1 << self.line) != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// A console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Press(usize),
    ReleaseAll,
    SetLines(u32),
    Quit,
}

/// Parse one console line
///
/// Returns `None` for blank or unrecognized input.
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("p", Some(n)) => {
            let button: usize = n.parse().ok()?;
            if button >= MAX_LINES {
                return None;
            }
            ConsoleCommand::Press(button)
        }
        ("r", None) => ConsoleCommand::ReleaseAll,
        ("m", Some(mask)) => ConsoleCommand::SetLines(parse_mask(mask)?),
        ("q", None) => ConsoleCommand::Quit,
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

fn parse_mask(text: &str) -> Option<u32> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn apply(command: ConsoleCommand) {
    match command {
        ConsoleCommand::Press(button) => {
            BUTTON_LINES.fetch_or(1 << button, Ordering::Relaxed);
        }
        ConsoleCommand::ReleaseAll => BUTTON_LINES.store(0, Ordering::Relaxed),
        ConsoleCommand::SetLines(mask) => BUTTON_LINES.store(mask, Ordering::Relaxed),
        ConsoleCommand::Quit => {
            info!("Quit requested");
            std::process::exit(0);
        }
    }
}

/// Read console commands on a background thread
pub fn spawn_console() {
    thread::Builder::new()
        .name("chime-console".into())
        .spawn(|| {
            info!("Console ready: p <n> | r | m <mask> | q");
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "console read failed");
                        break;
                    }
                };
                match parse_command(&line) {
                    Some(command) => {
                        debug!(?command, "console");
                        apply(command);
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "unknown console command"),
                }
            }
            debug!("console closed");
        })
        .expect("failed to spawn console thread");
}

/// Entropy from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEntropy;

impl EntropySource for HostEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|_| EntropyError::Unavailable)?;
        Ok(buf.len())
    }
}

/// Seed derived from the wall clock
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|t| t.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("p 2"), Some(ConsoleCommand::Press(2)));
        assert_eq!(parse_command("  r "), Some(ConsoleCommand::ReleaseAll));
        assert_eq!(parse_command("m 0x1f"), Some(ConsoleCommand::SetLines(0x1f)));
        assert_eq!(parse_command("m 5"), Some(ConsoleCommand::SetLines(5)));
        assert_eq!(parse_command("q"), Some(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("p"), None);
        assert_eq!(parse_command("p 32"), None);
        assert_eq!(parse_command("p x"), None);
        assert_eq!(parse_command("m 0xzz"), None);
        assert_eq!(parse_command("r now"), None);
        assert_eq!(parse_command("ring"), None);
    }

    #[test]
    fn test_host_entropy_fills_buffer() {
        let mut buf = [0u8; 32];
        assert_eq!(HostEntropy.fill(&mut buf), Ok(32));
    }

    #[test]
    fn test_output_tracks_level() {
        let mut pin = SimOutput::new(12);
        pin.set_high().unwrap();
        assert!(pin.high);
        pin.set_low().unwrap();
        assert!(!pin.high);
    }
}
