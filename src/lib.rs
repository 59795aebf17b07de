//! fast-ht: a single-threaded hash table for values keyed by 64-bit hashes
//! the caller has already computed, laid out for few cache misses per lookup.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an array of buckets where each bucket scans a short chain of
//!   fixed-width "bags" linearly, so most lookups touch one bucket and one
//!   bag.
//! - Layers:
//!   - `mix`: maps a caller hash to a bucket index with a one-round
//!     fasthash mix, a per-table salt and a power-of-two mask.
//!   - `bag`: eight `(hash, value)` slots plus a link to the next bag.
//!   - `bucket`: chain head and counters; the duplicate, vacancy and lookup
//!     scans over one chain.
//!   - `FastHashTable<V, S>`: bucket array, bag arena, salt, statistics,
//!     and the doubling resize.
//!
//! Constraints
//! - Single-threaded: every mutation takes `&mut self`; there is no internal
//!   locking.
//! - Hash `0` marks empty and deleted slots. Inserting it fails with
//!   `InsertError::ZeroHash`; looking it up finds nothing.
//! - Keys are compared by hash only. Two keys with the same 64-bit hash are
//!   the same key as far as the table is concerned.
//! - Duplicate inserts fail and leave the first value in place.
//!
//! Bags and tombstones
//! - Removing an entry zeroes its slot. The slot is reused by a later insert
//!   into the same bucket; the bag itself stays linked.
//! - Bags of one bucket-array generation live in a `slotmap` arena. A resize
//!   drains the old arena bag by bag and then drops it whole; dropping the
//!   table drops the current one.
//!
//! Growth
//! - A bucket's insert counter is bumped on every insert and never lowered
//!   on removal. When it goes from 0 to 1 the table counts one more filled
//!   bucket; if filled buckets exceed `fill_percent` of the bucket count the
//!   table doubles.
//! - The count is approximate between resizes (churn inflates it). Resizes
//!   rebuild it exactly from the live entries.
//! - Every resize draws a new salt from the table's `SaltSource`, so bucket
//!   placement cannot be predicted across tables or generations.
//!
//! Notes and non-goals
//! - No concurrent access; wrap the table in a lock if it must be shared.
//! - The table never hashes keys itself.
//! - With the `logging` feature, resizes are reported at debug level through
//!   the `log` facade.

mod bag;
mod bucket;
mod builder;
mod error;
pub mod mix;
pub mod salt;
mod table;
mod table_proptest;

// Public surface
pub use bag::BAGSZ;
pub use builder::{Builder, DEFAULT_FILL_PERCENT, DEFAULT_LOG2_BUCKETS};
pub use error::InsertError;
pub use salt::{FixedSalt, OsSalt, SaltSource};
pub use table::{FastHashTable, Iter, IterMut, Stats};
