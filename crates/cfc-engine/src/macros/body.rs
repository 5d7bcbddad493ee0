//! Macro-body analysis.
//!
//! A dedicated micro-tokenizer runs over the body text (everything after
//! the parameter list). It is narrower than the file lexer: it only knows
//! identifiers, the `##` paste operator and the structural symbols
//! `( ) { } [ ] ; , =`, and it never captures blocks.

use super::TemplatePart;

#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyTok {
    Ident(String),
    Paste,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Assign,
    Other,
}

fn tokenize_body(body: &str) -> Vec<BodyTok> {
    let bytes = body.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                i += 1;
            }
            if i < bytes.len() {
                i += 2;
            }
            continue;
        }
        if c == b'"' || c == b'\'' {
            i += 1;
            while i < bytes.len() {
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
        if c == b'#' && bytes.get(i + 1) == Some(&b'#') {
            tokens.push(BodyTok::Paste);
            i += 2;
            continue;
        }
        // Digit-leading runs ride along as ident-like parts so that
        // pasted suffixes such as `x##2` still concatenate.
        if c.is_ascii_alphanumeric() || c == b'_' {
            let start = i;
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(BodyTok::Ident(body[start..i].to_string()));
            continue;
        }
        i += 1;
        tokens.push(match c {
            b'(' => BodyTok::LParen,
            b')' => BodyTok::RParen,
            b'[' => BodyTok::LBracket,
            b']' => BodyTok::RBracket,
            b'{' => BodyTok::LBrace,
            b'}' => BodyTok::RBrace,
            b',' => BodyTok::Comma,
            b';' => BodyTok::Semi,
            b'=' => BodyTok::Assign,
            _ => BodyTok::Other,
        });
    }
    tokens
}

fn part_for(ident: &str, params: &[String]) -> TemplatePart {
    if params.iter().any(|p| p == ident) {
        TemplatePart::Param(ident.to_string())
    } else {
        TemplatePart::Literal(ident.to_string())
    }
}

/// Find the function-name paste run in a body shaped like a definition:
/// the identifier run whose parentheses close right before a `{` at
/// nesting depth zero. Bodies with no such `{` yield nothing.
pub(super) fn extract_name_template(body: &str, params: &[String]) -> Option<Vec<TemplatePart>> {
    let mut last: Option<Vec<TemplatePart>> = None;
    let mut paren_candidate: Option<Vec<TemplatePart>> = None;
    let mut pending: Option<Vec<TemplatePart>> = None;
    let mut pending_paste = false;
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;

    for token in tokenize_body(body) {
        match token {
            BodyTok::Paste => {
                pending_paste = last.is_some();
            }
            BodyTok::Ident(text) => {
                let part = part_for(&text, params);
                if pending_paste {
                    if let Some(run) = last.as_mut() {
                        run.push(part);
                    }
                } else {
                    last = Some(vec![part]);
                }
                pending_paste = false;
            }
            structural => {
                pending_paste = false;
                match structural {
                    BodyTok::LParen => {
                        if paren_depth == 0 && pending.is_none() {
                            paren_candidate.clone_from(&last);
                        }
                        paren_depth += 1;
                    }
                    BodyTok::RParen => {
                        if paren_depth > 0 {
                            paren_depth -= 1;
                            if paren_depth == 0 && pending.is_none() && paren_candidate.is_some() {
                                pending = paren_candidate.take();
                            }
                        }
                    }
                    BodyTok::LBracket => bracket_depth += 1,
                    BodyTok::RBracket => bracket_depth = bracket_depth.saturating_sub(1),
                    BodyTok::LBrace => {
                        if paren_depth == 0 && bracket_depth == 0 && pending.is_some() {
                            return pending;
                        }
                    }
                    BodyTok::Comma | BodyTok::Semi | BodyTok::Assign => {
                        if paren_depth == 0 && bracket_depth == 0 {
                            last = None;
                            paren_candidate = None;
                            pending = None;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    None
}

/// Accept the body only if it is one flat `##` paste chain of identifiers
/// with nothing else at all. A dangling trailing `##` voids it.
pub(super) fn extract_expansion_template(body: &str, params: &[String]) -> Option<Vec<TemplatePart>> {
    let mut parts: Option<Vec<TemplatePart>> = None;
    let mut pending_paste = false;

    for token in tokenize_body(body) {
        match token {
            BodyTok::Paste => pending_paste = true,
            BodyTok::Ident(text) => {
                let part = part_for(&text, params);
                match parts.as_mut() {
                    None => parts = Some(vec![part]),
                    Some(run) if pending_paste => run.push(part),
                    Some(_) => return None,
                }
                pending_paste = false;
            }
            _ => return None,
        }
    }
    if pending_paste {
        return None;
    }
    parts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn lit(s: &str) -> TemplatePart {
        TemplatePart::Literal(s.to_string())
    }

    fn param(s: &str) -> TemplatePart {
        TemplatePart::Param(s.to_string())
    }

    #[test]
    fn name_template_from_a_pasted_definition_body() {
        let tpl = extract_name_template(
            "void test_##x##_suffix(void) { return; }",
            &params(&["x"]),
        );
        assert_eq!(tpl, Some(vec![lit("test_"), param("x"), lit("_suffix")]));
    }

    #[test]
    fn name_template_requires_a_brace_at_depth_zero() {
        assert_eq!(
            extract_name_template("void helper_##x(void);", &params(&["x"])),
            None
        );
        // Braces inside the parameter parens do not count.
        assert_eq!(
            extract_name_template("void f(struct { int a; } arg)", &params(&["x"])),
            None
        );
    }

    #[test]
    fn separators_at_depth_zero_abandon_the_candidate() {
        // An assignment body is data, not a definition.
        assert_eq!(
            extract_name_template("int table_##x = { 0 }", &params(&["x"])),
            None
        );
    }

    #[test]
    fn a_statement_boundary_restarts_the_candidate_search() {
        let tpl = extract_name_template(
            "int unused_##x; void run_##x(void) { work(); }",
            &params(&["x"]),
        );
        assert_eq!(tpl, Some(vec![lit("run_"), param("x")]));
    }

    #[test]
    fn comments_and_strings_in_bodies_are_invisible()  {
        let tpl = extract_name_template(
            "void go_##x(void) /* { */ { puts(\"{\"); }",
            &params(&["x"]),
        );
        assert_eq!(tpl, Some(vec![lit("go_"), param("x")]));
    }

    #[test]
    fn expansion_accepts_only_pure_paste_chains() {
        assert_eq!(
            extract_expansion_template("a##_mid_##b", &params(&["a", "b"])),
            Some(vec![param("a"), lit("_mid_"), param("b")])
        );
        assert_eq!(
            extract_expansion_template("x", &params(&["x"])),
            Some(vec![param("x")])
        );
        assert_eq!(extract_expansion_template("x + 1", &params(&["x"])), None);
        assert_eq!(extract_expansion_template("f(x)", &params(&["x"])), None);
        assert_eq!(extract_expansion_template("x##", &params(&["x"])), None);
        assert_eq!(extract_expansion_template("", &params(&["x"])), None);
    }

    #[test]
    fn adjacent_identifiers_without_paste_void_the_expansion() {
        assert_eq!(
            extract_expansion_template("unsigned x", &params(&["x"])),
            None
        );
    }

    #[test]
    fn numeric_suffixes_paste_into_the_chain() {
        assert_eq!(
            extract_expansion_template("x##2", &params(&["x"])),
            Some(vec![param("x"), lit("2")])
        );
    }
}
