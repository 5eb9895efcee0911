/// Characters stripped from tokens before the alphabetic filter.
pub const SPECIAL_CHARS_FOR_EVENT_ID: &str = "!@#$%^&*()[]{};:,/<>?\\|`~-=+";

/// Structural key of a token string: every purely alphabetic word, concatenated,
/// followed by the total word count.
///
/// The count is taken from the token string as given, so numbers and wildcards
/// still widen the key even though their text is dropped.
///
/// ```
/// assert_eq!(
///     ulp::signature::event_id("PacketResponder 0 for block blk_38865049064139660 terminating"),
///     "PacketResponderforblockterminating6",
/// );
/// assert_eq!(ulp::signature::event_id(""), "0");
/// ```
pub fn event_id(token_string: &str) -> String {
    let length = token_string.split_whitespace().count();

    let cleaned = remove_special_chars(token_string);
    let mut id: String = cleaned
        .split_whitespace()
        .filter(|word| is_alpha(word))
        .collect();
    id.push_str(&length.to_string());
    id
}

pub fn remove_special_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !SPECIAL_CHARS_FOR_EVENT_ID.contains(*c))
        .collect()
}

/// True when every character is a letter. Vacuously true for "".
pub fn is_alpha(s: &str) -> bool {
    s.chars().all(char::is_alphabetic)
}
