//! Construction-time configuration for [`FastHashTable`].

use crate::salt::{OsSalt, SaltSource};
use crate::table::FastHashTable;

/// log2 of the bucket count used when none (or `0`) is given.
pub const DEFAULT_LOG2_BUCKETS: u32 = 10;

/// Resize once the estimated share of non-empty buckets exceeds this.
pub const DEFAULT_FILL_PERCENT: usize = 75;

/// Builds a [`FastHashTable`] with a chosen initial size, fill threshold and
/// salt source.
///
/// # Examples
///
/// ```rust
/// use fast_ht::{Builder, FixedSalt};
///
/// let mut table = Builder::new()
///     .log2_buckets(4)            // 16 buckets to start with
///     .fill_percent(60)           // grow earlier than the default 75%
///     .salt_source(FixedSalt(1))  // reproducible placement
///     .build();
///
/// table.insert(0x1234_5678_9abc_def0, "value").unwrap();
/// assert_eq!(table.find(0x1234_5678_9abc_def0), Some(&"value"));
/// ```
#[derive(Clone, Debug)]
pub struct Builder<S = OsSalt> {
    log2_buckets: u32,
    fill_percent: usize,
    salts: S,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            log2_buckets: DEFAULT_LOG2_BUCKETS,
            fill_percent: DEFAULT_FILL_PERCENT,
            salts: OsSalt,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SaltSource> Builder<S> {
    /// Start with `2^log2` buckets. `0` keeps the default of 1024.
    pub fn log2_buckets(self, log2: u32) -> Self {
        Self {
            log2_buckets: if log2 == 0 { DEFAULT_LOG2_BUCKETS } else { log2 },
            ..self
        }
    }

    /// Threshold, in percent of the bucket count, on the estimated number of
    /// non-empty buckets. Values of 100 or more disable growth.
    pub fn fill_percent(self, pct: usize) -> Self {
        Self {
            fill_percent: pct,
            ..self
        }
    }

    /// Where salts come from, at creation and on each resize.
    pub fn salt_source<T: SaltSource>(self, salts: T) -> Builder<T> {
        Builder {
            log2_buckets: self.log2_buckets,
            fill_percent: self.fill_percent,
            salts,
        }
    }

    /// # Panics
    /// If `2^log2_buckets` does not fit in `usize`.
    pub fn build<V>(self) -> FastHashTable<V, S> {
        FastHashTable::from_parts(self.log2_buckets, self.fill_percent, self.salts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salt::FixedSalt;

    #[test]
    fn defaults() {
        let t: FastHashTable<u8> = Builder::new().build();
        assert_eq!(t.bucket_count(), 1 << DEFAULT_LOG2_BUCKETS);
        assert_eq!(t.fill_percent(), DEFAULT_FILL_PERCENT);
    }

    #[test]
    fn zero_log2_means_default() {
        let t: FastHashTable<u8> = Builder::new().log2_buckets(0).build();
        assert_eq!(t.bucket_count(), 1024);
    }

    #[test]
    fn settings_survive_salt_source_swap() {
        let t: FastHashTable<u8, FixedSalt> = Builder::new()
            .log2_buckets(5)
            .fill_percent(40)
            .salt_source(FixedSalt(77))
            .build();
        assert_eq!(t.bucket_count(), 32);
        assert_eq!(t.fill_percent(), 40);
        assert_eq!(t.salt(), 77);
    }

    #[test]
    fn oversized_log2_panics() {
        let res = std::panic::catch_unwind(|| {
            let _t: FastHashTable<u8> = Builder::new().log2_buckets(usize::BITS).build();
        });
        assert!(res.is_err());
    }
}
