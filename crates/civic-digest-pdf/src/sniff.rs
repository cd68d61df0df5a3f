/// Returns true if a short buffer looks like a file path rather than file
/// content.
///
/// Catches the client bug where an upload form posts the *name* of a file
/// instead of its bytes. Buffers longer than `max_len` are never flagged,
/// and neither is anything that is not valid UTF-8. False positives on tiny
/// genuine files are accepted.
pub fn looks_like_path(buffer: &[u8], max_len: usize) -> bool {
    if buffer.len() > max_len {
        return false;
    }

    let Ok(content) = std::str::from_utf8(buffer) else {
        return false;
    };

    content.contains("./test/")
        || content.contains(".pdf")
        || content.starts_with('/')
        || content.contains('\\')
}
