//! Opportunity token generation.
//!
//! Tokens are short strings drawn uniformly, one character at a time, from
//! lowercase letters and digits with the easily confused `0 o 1 l i` removed.
//! They only need to be unpredictable to players reading a shared display,
//! not cryptographically secure.

use rand::Rng;

/// Characters a token may contain.
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyz23456789";

/// Default token length.
pub const DEFAULT_TOKEN_LENGTH: usize = 4;

/// Issues opportunity tokens of a fixed length.
///
/// # Example
///
/// ```
/// use boss_battles_core::token::{TokenIssuer, TOKEN_ALPHABET};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let issuer = TokenIssuer::new(6);
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let token = issuer.issue(&mut rng);
///
/// assert_eq!(token.len(), 6);
/// assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIssuer {
    length: usize,
}

impl TokenIssuer {
    /// Creates an issuer. A length of zero is raised to one.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    /// Token length.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Draws a fresh token.
    pub fn issue<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..self.length)
            .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
            .collect()
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn alphabet_has_no_ambiguous_characters() {
        for ambiguous in b"0o1li" {
            assert!(!TOKEN_ALPHABET.contains(ambiguous));
        }
        assert_eq!(TOKEN_ALPHABET.len(), 31);
    }

    #[test]
    fn default_length_is_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(TokenIssuer::default().issue(&mut rng).len(), 4);
    }

    #[test]
    fn zero_length_is_raised() {
        assert_eq!(TokenIssuer::new(0).length(), 1);
    }

    #[test]
    fn same_seed_same_tokens() {
        let issuer = TokenIssuer::default();
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..10 {
            assert_eq!(issuer.issue(&mut a), issuer.issue(&mut b));
        }
    }

    #[test]
    fn tokens_vary() {
        let issuer = TokenIssuer::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let tokens: std::collections::HashSet<_> = (0..50).map(|_| issuer.issue(&mut rng)).collect();
        assert!(tokens.len() > 40);
    }
}
