//! Call-site argument capture.
//!
//! Both recognition passes need the literal argument strings of a macro
//! invocation, so this works on raw source text rather than tokens.

/// Parse a balanced `(...)` argument list starting at `open_idx` (which
/// must point at the `(`). Returns the argument strings split at
/// top-level commas, plus the index just past the closing `)`.
///
/// Nested parentheses and brackets keep their commas; comments vanish;
/// string and char literals are copied through verbatim, escapes
/// included. `f()` yields no arguments, `f(a,)` yields `["a", ""]`.
/// An unterminated list yields `None`.
#[must_use]
pub fn parse_call_args(text: &str, open_idx: usize) -> Option<(Vec<String>, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(open_idx) != Some(&b'(') {
        return None;
    }

    let mut args: Vec<String> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut paren_depth = 1usize;
    let mut bracket_depth = 0usize;
    let mut i = open_idx + 1;

    let finish = |piece: &[u8]| String::from_utf8_lossy(piece).trim().to_string();

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'(' => {
                paren_depth += 1;
                current.push(c);
                i += 1;
            }
            b')' => {
                paren_depth -= 1;
                if paren_depth == 0 {
                    let arg = finish(&current);
                    if !arg.is_empty() || !args.is_empty() {
                        args.push(arg);
                    }
                    return Some((args, i + 1));
                }
                current.push(c);
                i += 1;
            }
            b'[' => {
                bracket_depth += 1;
                current.push(c);
                i += 1;
            }
            b']' => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(c);
                i += 1;
            }
            b',' if paren_depth == 1 && bracket_depth == 0 => {
                args.push(finish(&current));
                current.clear();
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                if i >= bytes.len() {
                    break;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                if i >= bytes.len() {
                    break;
                }
                i += 2;
            }
            b'"' | b'\'' => {
                let quote = c;
                current.push(c);
                i += 1;
                while i < bytes.len() {
                    current.push(bytes[i]);
                    if bytes[i] == b'\\' {
                        if i + 1 < bytes.len() {
                            current.push(bytes[i + 1]);
                            i += 2;
                            continue;
                        }
                    }
                    if bytes[i] == quote {
                        i += 1;
                        break;
                    }
                    i += 1;
                }
            }
            _ => {
                current.push(c);
                i += 1;
            }
        }
    }
    None
}
