//! Randomized advertisement identities

use heapless::String;
use rand_core::RngCore;

use crate::traits::radio::Address;

/// Characters in a generated identity
pub const IDENTITY_LEN: usize = 8;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short advertised name
pub type Identity = String<IDENTITY_LEN>;

/// Random locally-administered unicast address
pub fn random_address<R: RngCore>(rng: &mut R) -> Address {
    let mut octets = [0u8; 6];
    rng.fill_bytes(&mut octets);
    Address::localized(octets)
}

/// Random identity drawn from `[A-Z0-9]`
pub fn random_identity<R: RngCore>(rng: &mut R) -> Identity {
    let mut raw = [0u8; IDENTITY_LEN];
    rng.fill_bytes(&mut raw);
    let mut identity = Identity::new();
    for byte in raw {
        let index = usize::from(byte) % ALPHABET.len();
        let _ = identity.push(char::from(ALPHABET[index]));
    }
    identity
}

/// Random value in `[min, max)`; `min` when the range is empty
pub fn random_interval<R: RngCore>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    min + rng.next_u32() % (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRng;
    use proptest::prelude::*;

    #[test]
    fn test_identity_shape() {
        let mut rng = TestRng::new(7);
        for _ in 0..100 {
            let id = random_identity(&mut rng);
            assert_eq!(id.len(), IDENTITY_LEN);
            assert!(id
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_identities_vary() {
        let mut rng = TestRng::new(1);
        let first = random_identity(&mut rng);
        let second = random_identity(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_interval_range() {
        let mut rng = TestRng::new(3);
        assert_eq!(random_interval(&mut rng, 100, 100), 100);
    }

    proptest! {
        #[test]
        fn test_address_bits_forced(seed in 1u64..) {
            let mut rng = TestRng::new(seed);
            let addr = random_address(&mut rng);
            prop_assert!(addr.is_locally_administered());
            prop_assert!(addr.is_unicast());
        }

        #[test]
        fn test_interval_in_range(seed in 1u64.., min in 0u32..1000, span in 1u32..1000) {
            let mut rng = TestRng::new(seed);
            let value = random_interval(&mut rng, min, min + span);
            prop_assert!(value >= min && value < min + span);
        }
    }
}
