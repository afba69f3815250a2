use ethereum_types::H256;

/// Width in bytes of a single ABI word.
pub const WORD_SIZE: usize = 32;

/// The Keccak-256 hash of the empty byte string.
/// 0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470
pub const EMPTY_KECCAK: H256 = H256([
    197, 210, 70, 1, 134, 247, 35, 60, 146, 126, 125, 178, 220, 199, 3, 192, 229, 0, 182, 83, 202,
    130, 39, 59, 123, 250, 216, 4, 93, 133, 164, 112,
]);

/// Keccak-256 of `data`.
pub fn keccak256<T: AsRef<[u8]>>(data: T) -> H256 {
    keccak_hash::keccak(data)
}

/// The first `N` bytes of the Keccak-256 hash of `data`.
///
/// # Panics
/// If `N` is larger than the 32 bytes of a Keccak-256 digest.
pub fn keccak_prefix<const N: usize, T: AsRef<[u8]>>(data: T) -> [u8; N] {
    let digest = keccak256(data);
    let mut out = [0; N];
    out.copy_from_slice(&digest.as_bytes()[..N]);
    out
}
