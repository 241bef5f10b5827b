//! Shared-secret handling for inbound authentication.

/// Compare two byte strings without early exit on content.
///
/// Lengths are compared first and unequal lengths return immediately, so
/// the length of the secret is observable through timing. For equal
/// lengths every byte pair is XORed and OR-folded into one accumulator,
/// so the running time does not depend on where the inputs differ.
///
/// # Example
/// ```
/// use notify_relay::utils::secret::constant_time_eq;
///
/// assert!(constant_time_eq(b"s3cr3t", b"s3cr3t"));
/// assert!(!constant_time_eq(b"s3cr3t", b"s3cr3T"));
/// ```
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut mismatch = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        mismatch |= x ^ y;
    }

    std::hint::black_box(mismatch) == 0
}

/// The configured shared secret.
///
/// `Debug` never prints the value.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Check a caller-supplied secret in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(candidate.as_bytes(), self.0.as_bytes())
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"s3cr3t", b"s3cr3t"));
    }

    #[test]
    fn test_different_length() {
        assert!(!constant_time_eq(b"s3cr3t", b"s3cr3"));
        assert!(!constant_time_eq(b"", b"x"));
    }

    #[test]
    fn test_mismatch_at_every_position() {
        let secret = b"abcdefgh";
        for i in 0..secret.len() {
            let mut probe = *secret;
            probe[i] ^= 0x01;
            assert!(!constant_time_eq(secret, &probe), "mismatch at {i} not detected");
        }
    }

    #[test]
    fn test_shared_secret_matches() {
        let secret = SharedSecret::new("s3cr3t");
        assert!(secret.matches("s3cr3t"));
        assert!(!secret.matches("other"));
        assert!(!secret.matches("S3CR3T"));
    }

    #[test]
    fn test_shared_secret_debug_is_redacted() {
        let secret = SharedSecret::new("s3cr3t");
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn test_multibyte_secret() {
        let secret = SharedSecret::new("pässwörd");
        assert!(secret.matches("pässwörd"));
        assert!(!secret.matches("passwort"));
    }

    proptest! {
        #[test]
        fn prop_agrees_with_slice_equality(
            a in proptest::collection::vec(any::<u8>(), 0..64),
            b in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            prop_assert_eq!(constant_time_eq(&a, &b), a == b);
        }

        #[test]
        fn prop_single_flip_always_detected(
            a in proptest::collection::vec(any::<u8>(), 1..64),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255u8,
        ) {
            let mut b = a.clone();
            let i = index.index(b.len());
            b[i] ^= flip;
            prop_assert!(!constant_time_eq(&a, &b));
        }
    }
}
