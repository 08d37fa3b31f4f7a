//! Entropy source trait

/// Errors that can occur when reading entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntropyError {
    /// No hardware random number generator on this platform
    Unavailable,
}

/// Trait for a hardware random byte source
pub trait EntropySource {
    /// Fill `buf` with random bytes
    ///
    /// Returns the number of bytes written. A successful read fills the
    /// whole buffer.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, EntropyError>;
}

/// Entropy source for platforms without a random number generator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntropy;

impl EntropySource for NoEntropy {
    fn fill(&mut self, _buf: &mut [u8]) -> Result<usize, EntropyError> {
        Err(EntropyError::Unavailable)
    }
}
