/// A key-value pair. The key is the sole ordering criterion; the value is an
/// opaque payload.
#[derive(Debug)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}
