//! Salt sources: where a table draws the salt for each bucket-array
//! generation.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

/// Supplies a fresh 64-bit salt at table creation and on every resize.
pub trait SaltSource {
    fn next_salt(&mut self) -> u64;
}

/// Salt read from the operating system's random source.
#[derive(Copy, Clone, Debug, Default)]
pub struct OsSalt;

impl SaltSource for OsSalt {
    fn next_salt(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_ne_bytes(buf),
            Err(_e) => {
                #[cfg(feature = "logging")]
                log::warn!("OS random source failed ({_e}); deriving salt from RandomState");
                // RandomState keys are themselves seeded from the OS once per
                // thread and then stepped, so this still varies per call.
                RandomState::new().hash_one(buf)
            }
        }
    }
}

/// The same salt every time. Makes bucket placement reproducible, which is
/// useful for tests and for layout debugging; gives up flooding resistance.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FixedSalt(pub u64);

impl SaltSource for FixedSalt {
    #[inline]
    fn next_salt(&mut self) -> u64 {
        self.0
    }
}

impl<S: SaltSource + ?Sized> SaltSource for &mut S {
    #[inline]
    fn next_salt(&mut self) -> u64 {
        (**self).next_salt()
    }
}

impl<S: SaltSource + ?Sized> SaltSource for Box<S> {
    #[inline]
    fn next_salt(&mut self) -> u64 {
        (**self).next_salt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_salt_is_constant() {
        let mut s = FixedSalt(0xabc);
        assert_eq!(s.next_salt(), 0xabc);
        assert_eq!(s.next_salt(), 0xabc);
    }

    #[test]
    fn os_salt_varies() {
        let mut s = OsSalt;
        let draws: std::collections::BTreeSet<u64> = (0..8).map(|_| s.next_salt()).collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn boxed_and_borrowed_sources_forward() {
        fn draw<S: SaltSource>(mut s: S) -> u64 {
            s.next_salt()
        }
        let mut inner = FixedSalt(7);
        assert_eq!(draw(&mut inner), 7);
        let boxed: Box<dyn SaltSource> = Box::new(FixedSalt(9));
        assert_eq!(draw(boxed), 9);
    }
}
