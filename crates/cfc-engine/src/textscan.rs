//! Raw-text definition scanner.
//!
//! A second, independent recognition strategy that walks the source text
//! character by character instead of consuming the token stream. It
//! mirrors the recognizer's candidate state machine but additionally
//! tracks brace depth (there is no block capture here), which lets it
//! spot macro invocations and definitions with slightly different blind
//! spots than the token pass. The two results are reconciled afterwards.

use crate::keywords;
use crate::lexer::skip_logical_line;
use crate::macros::{MacroTable, parse_call_args};

/// What the text pass found, with the macro-derived subsets broken out
/// for reconciliation against the token pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Every definition name, in source order.
    pub ordered: Vec<String>,
    /// Names whose declarator came from an expansion-macro render.
    pub macro_named: Vec<String>,
    /// Names produced by whole-definition name-template invocations.
    pub macro_template: Vec<String>,
}

/// Scan `text` for function definitions using `macros` for rendering.
#[must_use]
pub fn scan(text: &str, macros: &MacroTable) -> ScanOutcome {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut out = ScanOutcome::default();

    let mut i = 0usize;
    let mut at_line_start = true;
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;

    // (name, came from a macro render)
    let mut last_ident: Option<(String, bool)> = None;
    let mut paren_candidate: Option<(String, bool)> = None;
    let mut pending_name: Option<(String, bool)> = None;

    while i < len {
        if at_line_start {
            let mut j = i;
            while j < len && (bytes[j] == b' ' || bytes[j] == b'\t') {
                j += 1;
            }
            if j < len && bytes[j] == b'#' {
                i = skip_logical_line(bytes, j);
                continue;
            }
        }

        let c = bytes[i];
        if c == b'\n' {
            at_line_start = true;
            i += 1;
            continue;
        }
        at_line_start = false;

        if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < len && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            while i < len && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                i += 1;
            }
            if i >= len {
                break;
            }
            i += 2;
            continue;
        }
        if c == b'"' || c == b'\'' {
            i += 1;
            while i < len {
                if bytes[i] == b'\\' {
                    i += 2;
                } else if bytes[i] == c {
                    i += 1;
                    break;
                } else {
                    i += 1;
                }
            }
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            i += 1;
            while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let ident = &text[start..i];

            if keywords::is_control_keyword(ident) {
                last_ident = None;
                continue;
            }
            if keywords::is_decl_keyword(ident) {
                if brace_depth == 0 && paren_depth == 0 && bracket_depth == 0 {
                    last_ident = None;
                    paren_candidate = None;
                    pending_name = None;
                }
                continue;
            }

            // Whole-definition template invocation, only meaningful at
            // file scope.
            if brace_depth == 0 {
                if let Some(def) = macros.find_name_template(ident) {
                    let open = seek_open_paren(bytes, i);
                    if let Some(open) = open {
                        if let Some((call_args, end)) = parse_call_args(text, open) {
                            if call_args.len() == def.params.len() {
                                if let Some(name) = def.render_name(&call_args) {
                                    out.ordered.push(name.clone());
                                    out.macro_template.push(name);
                                }
                            }
                            i = end;
                            last_ident = None;
                            continue;
                        }
                    }
                }
            }

            // Rename-style expansion: the rendered text becomes the
            // candidate identifier.
            if let Some(def) = macros.find_expansion(ident) {
                if let Some(open) = seek_open_paren(bytes, i) {
                    if let Some((call_args, end)) = parse_call_args(text, open) {
                        if call_args.len() == def.params.len() {
                            if let Some(expanded) = def.render_expansion(&call_args) {
                                last_ident = Some((expanded, true));
                                i = end;
                                continue;
                            }
                        }
                    }
                }
            }

            last_ident = Some((ident.to_string(), false));
            continue;
        }

        match c {
            b'(' => {
                if paren_depth == 0 && pending_name.is_none() {
                    paren_candidate.clone_from(&last_ident);
                }
                paren_depth += 1;
            }
            b')' => {
                if paren_depth > 0 {
                    paren_depth -= 1;
                    if paren_depth == 0 && pending_name.is_none() && paren_candidate.is_some() {
                        pending_name = paren_candidate.take();
                    }
                }
            }
            b'[' => bracket_depth += 1,
            b']' => bracket_depth = bracket_depth.saturating_sub(1),
            b'{' => {
                if brace_depth == 0 && paren_depth == 0 && bracket_depth == 0 {
                    if let Some((name, via_macro)) = pending_name.take() {
                        out.ordered.push(name.clone());
                        if via_macro {
                            out.macro_named.push(name);
                        }
                        paren_candidate = None;
                        last_ident = None;
                    }
                }
                brace_depth += 1;
            }
            b'}' => brace_depth = brace_depth.saturating_sub(1),
            b';' | b',' | b'=' => {
                if brace_depth == 0 && paren_depth == 0 && bracket_depth == 0 {
                    last_ident = None;
                    paren_candidate = None;
                    pending_name = None;
                }
            }
            _ => {}
        }
        i += 1;
    }

    out
}

/// Index of a `(` following optional whitespace at `from`, if any.
fn seek_open_paren(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    if j < bytes.len() && bytes[j] == b'(' {
        Some(j)
    } else {
        None
    }
}
