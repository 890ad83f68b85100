//! Signing seed generation.
//!
//! # Usage
//!
//! ```bash
//! echo "BOOKSTORE_AUTH_KEY=$(bookstore keygen)" >> .env
//! ```

use std::io::Write;

use rand::RngCore;

use bookstore_server::services::auth::{SEED_LEN, SigningKeys};

/// Print a fresh random seed as hex on stdout, and its public key on stderr.
///
/// # Errors
///
/// Returns an error if the derived key is rejected or stdout is closed.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let seed = generate_seed();
    let keys = SigningKeys::from_seed(&seed)?;

    writeln!(std::io::stdout(), "{}", hex::encode(seed))?;
    tracing::info!(public_key = %hex::encode(keys.public_key()), "Generated signing seed");
    Ok(())
}

fn generate_seed() -> [u8; SEED_LEN] {
    let mut seed = [0u8; SEED_LEN];
    rand::rng().fill_bytes(&mut seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_are_random() {
        assert_ne!(generate_seed(), generate_seed());
    }

    #[test]
    fn test_seed_hex_is_64_chars() {
        let encoded = hex::encode(generate_seed());
        assert_eq!(encoded.len(), 64);
        assert!(SigningKeys::from_hex_seed(&encoded).is_ok());
    }
}
