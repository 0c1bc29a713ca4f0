//! Fixed-size chunking for the retrieval path

/// Split text into windows of `chunk_size` characters (not bytes) with
/// no overlap. The final chunk may be shorter. Concatenating the chunks
/// in order reconstructs the input exactly.
///
/// A `chunk_size` of zero yields no chunks.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 {
        return Vec::new();
    }

    text.chars()
        .collect::<Vec<char>>()
        .chunks(chunk_size)
        .map(|window| window.iter().collect())
        .collect()
}
