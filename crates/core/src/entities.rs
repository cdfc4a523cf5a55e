//! HTML character reference removal.
//!
//! References are recognised in three forms: `&name;` for a known named
//! entity, `&#digits;` and `&#xHEX;` (either case of `x`). A recognised
//! reference is deleted outright, leading `&` and trailing `;` included; no
//! replacement character is written. Anything else starting with `&` is left
//! exactly as written.
//!
//! Named entities are looked up in the WHATWG table shipped with
//! `html-escape`, matched case-sensitively.

use html_escape::decode_html_entities;

/// Longest name or digit run considered part of a single reference.
const MAX_REFERENCE_LEN: usize = 32;

/// Remove every well-formed HTML character reference from `text`.
///
/// # Example
///
/// ```rust
/// use htmlstrip_core::strip_entities;
///
/// assert_eq!(strip_entities("2010&ndash;2011"), "20102011");
/// assert_eq!(strip_entities("touche&#769;!"), "touche!");
/// assert_eq!(strip_entities("hello & good-bye;"), "hello & good-bye;");
/// ```
pub fn strip_entities(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(offset) = bytes[search..].iter().position(|&b| b == b'&') {
        let start = search + offset;

        match reference_end(bytes, start) {
            Some(end) => {
                output.push_str(&text[cursor..start]);
                cursor = end;
                search = end;
            }
            None => search = start + 1,
        }
    }

    output.push_str(&text[cursor..]);
    output
}

/// Whether `name` (without `&` and `;`) is a known named character reference.
pub fn is_named_entity(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_REFERENCE_LEN {
        return false;
    }

    let reference = format!("&{name};");
    let decoded = decode_html_entities(&reference);

    // A known reference decodes to one or two scalar values.
    decoded.as_ref() != reference.as_str() && decoded.chars().count() <= 2
}

/// Index just past the reference starting with the `&` at `start`.
fn reference_end(bytes: &[u8], start: usize) -> Option<usize> {
    let body = &bytes[start + 1..];

    let (prefix, is_digit): (usize, fn(&u8) -> bool) = match body {
        [b'#', b'x' | b'X', ..] => (2, u8::is_ascii_hexdigit),
        [b'#', ..] => (1, u8::is_ascii_digit),
        [first, ..] if first.is_ascii_alphabetic() => return named_reference_end(body, start),
        _ => return None,
    };

    let run = body[prefix..]
        .iter()
        .take(MAX_REFERENCE_LEN)
        .take_while(|&b| is_digit(b))
        .count();

    if run > 0 && body.get(prefix + run) == Some(&b';') {
        Some(start + 1 + prefix + run + 1)
    } else {
        None
    }
}

fn named_reference_end(body: &[u8], start: usize) -> Option<usize> {
    let run = body
        .iter()
        .take(MAX_REFERENCE_LEN)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();

    if body.get(run) != Some(&b';') {
        return None;
    }

    let name = std::str::from_utf8(&body[..run]).ok()?;
    is_named_entity(name).then_some(start + 1 + run + 1)
}
