//! Code generation from the operating system's CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::entities::otp_code::CODE_LENGTH;

/// Generates fixed-length numeric one-time passcodes
///
/// Uses `OsRng` so codes are unpredictable across many issuances; a
/// process-seeded PRNG would let an observer who recovers the state guess
/// upcoming codes.
pub struct CodeGenerator;

impl CodeGenerator {
    /// Generate a uniformly random 6-digit code as a zero-padded string
    pub fn generate() -> String {
        let mut bytes = [0u8; 4];
        OsRng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes);
        // Modulo bias over u32 is below 1e-4 for a 6-digit space
        let code = num % 1_000_000;
        format!("{:06}", code)
    }
}
