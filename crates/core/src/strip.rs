//! Markup-stripping passes over raw HTML text.
//!
//! Each pass is a single forward scan over the input that recognises one
//! kind of markup span and replaces it atomically. None of them parse HTML;
//! they only look for delimiters, so they never fail on malformed input.
//!
//! Comments and non-content elements are replaced with a single space so
//! that the words on either side stay apart. Bare tags are replaced with
//! nothing so inline markup does not introduce new whitespace.

/// Replacement for a removed comment or element span.
const SPAN_GAP: &str = " ";

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Remove every `<!-- ... -->` comment, replacing each with one space.
///
/// The closing delimiter is strictly `-->`, so anything before it (including
/// tag-like text, newlines, or `//-->`) belongs to the comment. A comment
/// with no closing delimiter runs to the end of the input.
///
/// # Example
///
/// ```rust
/// use htmlstrip_core::strip_comments;
///
/// assert_eq!(strip_comments("A<!-- B -->C"), "A C");
/// ```
pub fn strip_comments(html: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find(COMMENT_OPEN) {
        output.push_str(&rest[..start]);
        output.push_str(SPAN_GAP);

        let body = &rest[start + COMMENT_OPEN.len()..];
        match body.find(COMMENT_CLOSE) {
            Some(end) => rest = &body[end + COMMENT_CLOSE.len()..],
            None => return output,
        }
    }

    output.push_str(rest);
    output
}

/// Remove every `<name ...> ... </name>` element, replacing each with one space.
///
/// The tag name matches case-insensitively and the opening tag may carry
/// attributes spread over several lines. The element ends at the first
/// matching closing tag. Tags with other names are left untouched.
///
/// An opening tag without a closing tag removes the rest of the input; an
/// opening tag whose `>` is missing before the next `<` is not treated as an
/// element.
///
/// # Example
///
/// ```rust
/// use htmlstrip_core::strip_element;
///
/// let html = "<title>Hello</title><script>potato</script> world";
/// assert_eq!(strip_element(html, "script"), "<title>Hello</title>  world");
/// ```
pub fn strip_element(html: &str, name: &str) -> String {
    let name = name.trim().as_bytes();
    if name.is_empty() {
        return html.to_string();
    }

    let bytes = html.as_bytes();
    let mut output = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(start) = find_opening_tag(bytes, name, search) {
        let Some(open_end) = opening_tag_end(bytes, start + 1 + name.len()) else {
            search = start + 1;
            continue;
        };

        output.push_str(&html[cursor..start]);
        output.push_str(SPAN_GAP);

        match find_closing_tag(bytes, name, open_end + 1) {
            Some(end) => {
                cursor = end;
                search = end;
            }
            None => return output,
        }
    }

    output.push_str(&html[cursor..]);
    output
}

/// Remove every remaining `< ... >` tag without inserting whitespace.
///
/// A tag starts with `<` followed by a letter, `/`, `!` or `?`, so a bare `<`
/// in running text is kept. Tags may span lines, and quoted attribute values
/// may contain `>`. A `<` that is never closed is kept verbatim.
///
/// # Example
///
/// ```rust
/// use htmlstrip_core::strip_tags;
///
/// assert_eq!(strip_tags("<b>hello</b> world!"), "hello world!");
/// assert_eq!(strip_tags("<a \n name=toc>table of contents</a>"), "table of contents");
/// ```
pub fn strip_tags(html: &str) -> String {
    let bytes = html.as_bytes();
    let Some(last_close) = bytes.iter().rposition(|&b| b == b'>') else {
        return html.to_string();
    };

    let mut output = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(start) = find_byte(bytes, b'<', search) {
        if start > last_close {
            break;
        }

        match tag_end(bytes, start) {
            Some(end) => {
                output.push_str(&html[cursor..start]);
                cursor = end;
                search = end;
            }
            None => search = start + 1,
        }
    }

    output.push_str(&html[cursor..]);
    output
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes.get(from..)?.iter().position(|&b| b == needle).map(|offset| from + offset)
}

/// The `>` closing an opening tag, unless another `<` comes first.
fn opening_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let offset = bytes.get(from..)?.iter().position(|&b| b == b'>' || b == b'<')?;
    (bytes[from + offset] == b'>').then_some(from + offset)
}

/// Whether `bytes[at..]` starts with `name`, ignoring ASCII case.
fn starts_with_name(bytes: &[u8], at: usize, name: &[u8]) -> bool {
    bytes
        .get(at..at + name.len())
        .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// Find the next `<name` that is followed by whitespace, `>` or `/`.
fn find_opening_tag(bytes: &[u8], name: &[u8], from: usize) -> Option<usize> {
    let mut search = from;

    while let Some(start) = find_byte(bytes, b'<', search) {
        let after = start + 1 + name.len();
        if starts_with_name(bytes, start + 1, name)
            && bytes
                .get(after)
                .is_some_and(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/')
        {
            return Some(start);
        }
        search = start + 1;
    }

    None
}

/// Find the next `</name>` (optional whitespace before `>`) and return the
/// index just past it.
fn find_closing_tag(bytes: &[u8], name: &[u8], from: usize) -> Option<usize> {
    let mut search = from;

    while let Some(start) = find_byte(bytes, b'<', search) {
        search = start + 1;

        if bytes.get(start + 1) != Some(&b'/') || !starts_with_name(bytes, start + 2, name) {
            continue;
        }

        let mut end = start + 2 + name.len();
        while bytes.get(end).is_some_and(u8::is_ascii_whitespace) {
            end += 1;
        }

        if bytes.get(end) == Some(&b'>') {
            return Some(end + 1);
        }
    }

    None
}

/// Index just past the `>` that closes the tag opened at `start`.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    match bytes.get(start + 1) {
        Some(&b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?') => {}
        _ => return None,
    }

    let mut quote: Option<u8> = None;
    let mut after_equals = false;

    for (offset, &b) in bytes[start + 1..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'>' => return Some(start + 1 + offset + 1),
                b'"' | b'\'' if after_equals => quote = Some(b),
                b'=' => {
                    after_equals = true;
                    continue;
                }
                _ if b.is_ascii_whitespace() => continue,
                _ => {}
            },
        }
        after_equals = false;
    }

    // Unbalanced quote: fall back to the first `>`.
    find_byte(bytes, b'>', start + 1).map(|end| end + 1)
}
