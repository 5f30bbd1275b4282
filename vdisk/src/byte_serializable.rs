/// A record with a fixed on-disk encoding.
pub trait ByteSerializable {
    type BytesArrayType;

    fn to_bytes(&self) -> Self::BytesArrayType;
    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized;
    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8];

    /// Encoded length in bytes.
    fn size() -> u64
    where
        Self: core::marker::Sized;
}
