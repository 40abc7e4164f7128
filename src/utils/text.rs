/// ROT13 over ASCII letters; everything else is left untouched.
pub fn rot13(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            'a'..='z' => rotate(ch, b'a', 26, 13),
            'A'..='Z' => rotate(ch, b'A', 26, 13),
            _ => ch,
        })
        .collect()
}

/// ROT47 over printable ASCII (`!` to `~`).
pub fn rot47(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '!'..='~' => rotate(ch, b'!', 94, 47),
            _ => ch,
        })
        .collect()
}

fn rotate(ch: char, base: u8, alphabet: u8, shift: u8) -> char {
    let offset = ch as u8 - base;
    (base + (offset + shift) % alphabet) as char
}
