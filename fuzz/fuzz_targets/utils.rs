use std::str;

/// Inputs are capped so pathological cases stay fast.
pub const MAX_INPUT_SIZE: usize = 256 * 1024;

/// `data` truncated to [`MAX_INPUT_SIZE`] as UTF-8, trimming up to three bytes
/// if the cut landed inside a codepoint.
#[inline]
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let cap = data.len().min(MAX_INPUT_SIZE);
    (0..=3.min(cap)).find_map(|trim| str::from_utf8(&data[..cap - trim]).ok())
}
