use num_traits::FromBytes;

/// decode a little endian byte buffer into values of `N` bytes each. Trailing bytes that
/// do not make up a full value are ignored.
pub(crate) fn decode_le<T, const N: usize>(bytes: &[u8]) -> Vec<T>
where
    T: FromBytes<Bytes = [u8; N]>,
{
    bytes
        .chunks_exact(N)
        .filter_map(|chunk| <[u8; N]>::try_from(chunk).ok())
        .map(|chunk| T::from_le_bytes(&chunk))
        .collect()
}

/// read a little endian block header of `size` bytes
pub(crate) fn header_value(bytes: &[u8], size: usize) -> Option<u64> {
    match size {
        4 => decode_le::<u32, 4>(bytes.get(..4)?).first().map(|v| *v as u64),
        8 => decode_le::<u64, 8>(bytes.get(..8)?).first().copied(),
        _ => None,
    }
}
