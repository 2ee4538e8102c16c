const TRUNCATED_MARKER: &str = "\n.[truncated]";
pub const MAX_PREVIEW_CONTENT: usize = 4_096;

/// Bounded slice of generated documentation for terminal display. The full
/// document can run to megabytes; the review surface only needs the head.
pub fn documentation_preview(markdown: &str) -> String {
    if markdown.len() <= MAX_PREVIEW_CONTENT {
        markdown.to_string()
    } else {
        let mut end = MAX_PREVIEW_CONTENT;
        while end > 0 && !markdown.is_char_boundary(end) {
            end -= 1;
        }
        let truncated = &markdown[..end];
        format!("{truncated}{TRUNCATED_MARKER}")
    }
}
