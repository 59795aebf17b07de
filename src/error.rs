/// Why an insert left the table unchanged.
#[derive(thiserror::Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum InsertError {
    /// A slot already holds exactly this hash. The existing value is kept.
    #[error("an entry with this hash is already present")]
    DuplicateHash,

    /// Zero marks empty and deleted slots, so it cannot be stored.
    #[error("hash value 0 is reserved for empty slots")]
    ZeroHash,
}
