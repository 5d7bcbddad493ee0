//! C-aware tokenizer.
//!
//! Produces a flat, left-to-right token stream good enough to recognize
//! function definitions without parsing statement-level C:
//!
//! - comments and preprocessor lines are never emitted as ordinary tokens;
//! - string/char/numeric literals come out as opaque [`TokenKind::Literal`];
//! - identifiers are classified against the keyword tables;
//! - an entire balanced `{...}` region is swallowed into one opaque
//!   [`TokenKind::Block`] token, so statement bodies never reach the
//!   recognizer;
//! - `#define` lines (wherever they appear, including inside captured
//!   blocks) are surfaced as [`TokenKind::PpDefine`] tokens carrying the
//!   continuation-joined line text for the macro table to parse.
//!
//! Unterminated comments, literals or blocks at end-of-file truncate
//! silently: lexing stops and no token is emitted for the dangling
//! construct.

use std::ops::Range;

use crate::keywords;

/// A classified lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A plain identifier (not a known keyword), carrying its text.
    Ident(String),
    /// Storage-class / type / qualifier / specifier keyword.
    DeclKeyword,
    /// Flow-control keyword.
    ControlKeyword,
    /// String, character or numeric literal; contents are opaque.
    Literal,
    /// An entire balanced `{...}` region, contents opaque.
    Block,
    /// A continuation-joined `#define` line, raw text from `#` onward.
    PpDefine(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Assign,
    /// Any other punctuation (`*`, `&`, `.`, `...`, stray `}`, ...).
    Other,
}

/// A token plus its byte range in the source. Spans let the recognizer go
/// back to the raw text when it needs exact call-site argument strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    /// The raw source text covered by this token.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Tokenize `source` in one pass.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
    /// Defines found while swallowing a block; flushed after the block token.
    pending_defines: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            at_line_start: true,
            tokens: Vec::new(),
            pending_defines: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.src.len() {
            if self.at_line_start && self.try_preprocessor_line() {
                continue;
            }

            let c = self.src[self.pos];
            if c == b'\n' {
                self.at_line_start = true;
                self.pos += 1;
                continue;
            }
            if c.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }
            self.at_line_start = false;

            if self.skip_comment() {
                continue;
            }
            if c == b'"' || c == b'\'' {
                self.lex_quoted(c);
                continue;
            }
            if c.is_ascii_alphabetic() || c == b'_' {
                self.lex_identifier();
                continue;
            }
            if c.is_ascii_digit() {
                self.lex_number();
                continue;
            }
            if c == b'{' {
                self.lex_block();
                continue;
            }
            self.lex_punct(c);
        }
        self.tokens
    }

    // ── Character-level helpers ────────────────────────────────────────

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Skip `//` and `/* */` comments. An unterminated block comment
    /// consumes the rest of the input.
    fn skip_comment(&mut self) -> bool {
        if self.src[self.pos] != b'/' {
            return false;
        }
        match self.peek(1) {
            Some(b'/') => {
                while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
                    self.pos += 1;
                }
                true
            }
            Some(b'*') => {
                let mut i = self.pos + 2;
                while i + 1 < self.src.len() {
                    if self.src[i] == b'*' && self.src[i + 1] == b'/' {
                        self.pos = i + 2;
                        return true;
                    }
                    i += 1;
                }
                self.pos = self.src.len();
                true
            }
            _ => false,
        }
    }

    /// Consume a string or character literal, honoring backslash escapes.
    /// Emits a `Literal` token only when the closing quote is found.
    fn lex_quoted(&mut self, quote: u8) {
        let start = self.pos;
        let mut i = self.pos + 1;
        while i < self.src.len() {
            match self.src[i] {
                b'\\' => i += 2,
                c if c == quote => {
                    self.pos = i + 1;
                    self.tokens.push(Token {
                        kind: TokenKind::Literal,
                        span: start..self.pos,
                    });
                    return;
                }
                _ => i += 1,
            }
        }
        // Unterminated literal: truncate silently.
        self.pos = self.src.len();
    }

    fn lex_identifier(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.src.len() {
            let c = self.src[self.pos];
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        let kind = if keywords::is_control_keyword(text) {
            TokenKind::ControlKeyword
        } else if keywords::is_decl_keyword(text) {
            TokenKind::DeclKeyword
        } else {
            TokenKind::Ident(text.to_string())
        };
        self.tokens.push(Token {
            kind,
            span: start..self.pos,
        });
    }

    /// Numeric constants are opaque; suffixes and hex digits ride along.
    fn lex_number(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.src.len() {
            let c = self.src[self.pos];
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::Literal,
            span: start..self.pos,
        });
    }

    fn lex_punct(&mut self, c: u8) {
        let start = self.pos;
        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semi,
            b'=' => TokenKind::Assign,
            b'.' if self.peek(1) == Some(b'.') && self.peek(2) == Some(b'.') => {
                self.pos += 2;
                TokenKind::Other
            }
            _ => TokenKind::Other,
        };
        self.pos += 1;
        self.tokens.push(Token {
            kind,
            span: start..self.pos,
        });
    }

    // ── Block capture ──────────────────────────────────────────────────

    /// Swallow a balanced `{...}` region into one opaque token, skipping
    /// comments, literals and preprocessor lines inside. `#define` lines
    /// found inside the block are still captured (their macros are visible
    /// file-wide) and flushed right after the block token.
    ///
    /// An unterminated block emits nothing.
    fn lex_block(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        let mut line_start = false;
        let mut i = self.pos;

        while i < self.src.len() {
            if line_start {
                let mut j = i;
                while j < self.src.len() && (self.src[j] == b' ' || self.src[j] == b'\t') {
                    j += 1;
                }
                if j < self.src.len() && self.src[j] == b'#' {
                    if let Some((joined, end)) = capture_define(self.src, j) {
                        self.pending_defines.push(Token {
                            kind: TokenKind::PpDefine(joined),
                            span: j..end,
                        });
                        i = end;
                    } else {
                        i = skip_logical_line(self.src, j);
                    }
                    continue;
                }
            }

            let c = self.src[i];
            line_start = c == b'\n';
            match c {
                b'/' if self.src.get(i + 1) == Some(&b'/') => {
                    while i < self.src.len() && self.src[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if self.src.get(i + 1) == Some(&b'*') => {
                    let mut j = i + 2;
                    loop {
                        if j + 1 >= self.src.len() {
                            // Unterminated comment inside a block: the
                            // block itself is unterminated too.
                            self.pos = self.src.len();
                            return;
                        }
                        if self.src[j] == b'*' && self.src[j + 1] == b'/' {
                            i = j + 2;
                            break;
                        }
                        j += 1;
                    }
                    continue;
                }
                b'"' | b'\'' => {
                    let quote = c;
                    i += 1;
                    while i < self.src.len() {
                        if self.src[i] == b'\\' {
                            i += 2;
                        } else if self.src[i] == quote {
                            i += 1;
                            break;
                        } else {
                            i += 1;
                        }
                    }
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = i + 1;
                        self.tokens.push(Token {
                            kind: TokenKind::Block,
                            span: start..self.pos,
                        });
                        self.tokens.append(&mut self.pending_defines);
                        return;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        // EOF before the matching close: no token for the truncated block.
        self.pos = self.src.len();
        self.pending_defines.clear();
    }

    // ── Preprocessor lines ─────────────────────────────────────────────

    /// At a line start, consume a whole preprocessor logical line if one
    /// begins here. `#define` lines become `PpDefine` tokens; everything
    /// else is skipped without affecting recognizer state.
    fn try_preprocessor_line(&mut self) -> bool {
        let mut j = self.pos;
        while j < self.src.len() && (self.src[j] == b' ' || self.src[j] == b'\t') {
            j += 1;
        }
        if j >= self.src.len() || self.src[j] != b'#' {
            return false;
        }
        if let Some((joined, end)) = capture_define(self.src, j) {
            self.tokens.push(Token {
                kind: TokenKind::PpDefine(joined),
                span: j..end,
            });
            self.pos = end;
        } else {
            self.pos = skip_logical_line(self.src, j);
        }
        self.at_line_start = true;
        true
    }
}

/// Advance past a preprocessor logical line starting at `start` (which
/// points at `#`), honoring trailing-backslash continuations. Returns the
/// index just past the terminating newline (or the end of input).
pub(crate) fn skip_logical_line(src: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < src.len() {
        if src[i] == b'\n' && !continues(src, i) {
            return i + 1;
        }
        i += 1;
    }
    src.len()
}

/// True if the newline at `nl` is escaped by a trailing backslash
/// (allowing a `\r` in between for CRLF input).
fn continues(src: &[u8], nl: usize) -> bool {
    if nl == 0 {
        return false;
    }
    if src[nl - 1] == b'\\' {
        return true;
    }
    nl >= 2 && src[nl - 1] == b'\r' && src[nl - 2] == b'\\'
}

/// If the directive at `start` (pointing at `#`) is a `#define`, capture
/// the whole logical line with continuations spliced out and return it
/// along with the index past the line end. Any other directive returns
/// `None`.
fn capture_define(src: &[u8], start: usize) -> Option<(String, usize)> {
    let mut j = start + 1;
    while j < src.len() && (src[j] == b' ' || src[j] == b'\t') {
        j += 1;
    }
    if !src[j..].starts_with(b"define") {
        return None;
    }
    let after = j + 6;
    // "define" must end the word: "#definex" is not a define.
    if after < src.len() && (src[after].is_ascii_alphanumeric() || src[after] == b'_') {
        return None;
    }

    let end = skip_logical_line(src, start);
    let raw = &src[start..end];
    let mut joined = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' {
            if raw.get(i + 1) == Some(&b'\n') {
                i += 2;
                continue;
            }
            if raw.get(i + 1) == Some(&b'\r') && raw.get(i + 2) == Some(&b'\n') {
                i += 3;
                continue;
            }
        }
        if raw[i] == b'\n' || raw[i] == b'\r' {
            // A bare newline can only be the final terminator.
            break;
        }
        joined.push(raw[i]);
        i += 1;
    }
    Some((String::from_utf8_lossy(&joined).into_owned(), end))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn ident(text: &str) -> TokenKind {
        TokenKind::Ident(text.to_string())
    }

    #[test]
    fn classifies_a_simple_definition() {
        let toks = kinds("int main(void) { return 0; }");
        assert_eq!(
            toks,
            vec![
                TokenKind::DeclKeyword, // int
                ident("main"),
                TokenKind::LParen,
                TokenKind::DeclKeyword, // void
                TokenKind::RParen,
                TokenKind::Block,
            ]
        );
    }

    #[test]
    fn comments_and_literals_are_opaque() {
        let toks = kinds("x /* {{{ */ = \"}\" // trailing (\n;");
        assert_eq!(
            toks,
            vec![
                ident("x"),
                TokenKind::Assign,
                TokenKind::Literal,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn block_capture_swallows_nested_braces_and_tricky_contents() {
        let src = "void f(void) { if (a) { b(\"}\"); } /* } */ char c = '}'; }";
        let toks = tokenize(src);
        let block = toks.last().expect("block token");
        assert_eq!(block.kind, TokenKind::Block);
        assert_eq!(block.text(src), &src[13..]);
    }

    #[test]
    fn unterminated_block_emits_nothing() {
        let toks = kinds("void f(void) { int x = 1;");
        assert_eq!(
            toks,
            vec![
                TokenKind::DeclKeyword,
                ident("f"),
                TokenKind::LParen,
                TokenKind::DeclKeyword,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn unterminated_comment_and_string_truncate() {
        assert_eq!(kinds("a /* no end"), vec![ident("a")]);
        assert_eq!(kinds("a \"no end"), vec![ident("a")]);
    }

    #[test]
    fn non_define_directives_are_skipped_entirely() {
        let toks = kinds("#include <stdio.h>\n#pragma once\nint x;");
        assert_eq!(
            toks,
            vec![TokenKind::DeclKeyword, ident("x"), TokenKind::Semi]
        );
    }

    #[test]
    fn define_lines_are_captured_with_continuations_joined() {
        let src = "#define MAKE(x) void make_##x(void) \\\n  { body(); }\nint y;";
        let toks = tokenize(src);
        let TokenKind::PpDefine(line) = &toks[0].kind else {
            panic!("expected a define token, got {:?}", toks[0].kind);
        };
        assert_eq!(line, "#define MAKE(x) void make_##x(void)   { body(); }");
    }

    #[test]
    fn crlf_continuations_join_too() {
        let src = "#define M(a) a\\\r\n_tail\n";
        let toks = tokenize(src);
        let TokenKind::PpDefine(line) = &toks[0].kind else {
            panic!("expected a define token");
        };
        assert_eq!(line, "#define M(a) a_tail");
    }

    #[test]
    fn defines_inside_blocks_are_still_surfaced() {
        let src = "void f(void) {\n#define IN(x) x\n  g();\n}\nint z;";
        let toks = kinds(src);
        assert_eq!(
            toks,
            vec![
                TokenKind::DeclKeyword,
                ident("f"),
                TokenKind::LParen,
                TokenKind::DeclKeyword,
                TokenKind::RParen,
                TokenKind::Block,
                TokenKind::PpDefine("#define IN(x) x".to_string()),
                TokenKind::DeclKeyword,
                ident("z"),
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn a_directive_mid_line_is_not_a_directive() {
        // '#' only starts a preprocessor line at a line start.
        let toks = kinds("int a; x # y;");
        assert!(toks.contains(&ident("y")));
    }

    #[test]
    fn ellipsis_is_one_token() {
        let toks = tokenize("f(int n, ...)");
        let other: Vec<_> = toks.iter().filter(|t| t.kind == TokenKind::Other).collect();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].span.len(), 3);
    }

    #[test]
    fn numbers_are_opaque_literals() {
        let toks = kinds("x = 0xFFull + 1.5e3;");
        let literals = toks
            .iter()
            .filter(|k| **k == TokenKind::Literal)
            .count();
        assert!(literals >= 2);
    }
}
