/// Classic rotating hash over the raw bytes of a key.
///
/// The accumulator starts at the key's byte length truncated to 8 bits,
/// then folds in each byte as `acc = ((acc << 4) ^ (acc >> 28)) ^ b`. In
/// 8-bit width the right shift by 28 always yields zero; the degenerate
/// term is kept so bucket distributions match the original tables this
/// function was lifted from. With only 8 bits of state the hash takes at
/// most 256 distinct values, so tables with more than 256 buckets leave
/// the high buckets structurally unreachable.
pub fn rotating_hash(key: &[u8]) -> u8 {
    let mut acc = key.len() as u8;
    for &b in key {
        acc = (acc.wrapping_shl(4) ^ acc.checked_shr(28).unwrap_or(0)) ^ b;
    }
    acc
}
