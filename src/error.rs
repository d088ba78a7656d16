use thiserror::Error;

/// The error returned when inserting a key that is already present in a map or
/// set.
///
/// A duplicate insertion is a no-op: the tree is left structurally identical to
/// what it was before the call, and ownership of the rejected pair is handed
/// back to the caller. Callers that want insert-or-update semantics can remove
/// the old pair and retry.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("key is already present")]
pub struct DuplicateKeyError<T, U> {
    /// The key that was already present.
    pub key: T,
    /// The value that was not inserted.
    pub value: U,
}
