//! Token-stream definition recognizer.
//!
//! Runs over the block-captured token stream and decides, at each opaque
//! `{...}` token, whether the tokens before it form a function signature.
//! The state machine is three counters and three identifier slots; it
//! never builds a syntax tree.
//!
//! Macro awareness: an identifier naming a registered macro is resolved
//! through the macro table. A name-template invocation is itself a whole
//! definition and records immediately; an expansion invocation substitutes
//! its rendered text as the candidate identifier; a macro with neither
//! template consumes its arguments and produces nothing.

use crate::lexer::{Token, TokenKind};
use crate::macros::{MacroTable, parse_call_args};

/// Token-pass result: names in source order plus a count of structural
/// anomalies (unmatched closers), kept for diagnostics only.
#[derive(Debug, Default)]
pub struct TokenPassOutcome {
    pub names: Vec<String>,
    pub anomalies: usize,
}

type Candidate = Option<String>;

/// Walk `tokens` (lexed from `source`) and collect function definitions.
#[must_use]
pub fn recognize(source: &str, tokens: &[Token], macros: &MacroTable) -> TokenPassOutcome {
    let mut out = TokenPassOutcome::default();

    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;
    let mut last_ident: Candidate = None;
    let mut paren_candidate: Candidate = None;
    let mut pending_name: Candidate = None;

    let mut idx = 0;
    while idx < tokens.len() {
        let token = &tokens[idx];
        match &token.kind {
            TokenKind::PpDefine(_) | TokenKind::Literal | TokenKind::Other => {}

            TokenKind::ControlKeyword => {
                last_ident = None;
            }

            TokenKind::DeclKeyword => {
                if paren_depth == 0 && bracket_depth == 0 {
                    last_ident = None;
                    paren_candidate = None;
                    pending_name = None;
                }
            }

            TokenKind::Ident(text) => {
                if let Some(skip_to) =
                    handle_macro_ident(source, tokens, idx, text, macros, &mut out, &mut last_ident)
                {
                    idx = skip_to;
                    continue;
                }
                last_ident = Some(text.clone());
            }

            TokenKind::LParen => {
                if paren_depth == 0 && pending_name.is_none() {
                    paren_candidate.clone_from(&last_ident);
                }
                paren_depth += 1;
            }

            TokenKind::RParen => {
                if paren_depth > 0 {
                    paren_depth -= 1;
                    if paren_depth == 0 && pending_name.is_none() && paren_candidate.is_some() {
                        pending_name = paren_candidate.take();
                    }
                } else {
                    out.anomalies += 1;
                }
            }

            TokenKind::LBracket => bracket_depth += 1,

            TokenKind::RBracket => {
                if bracket_depth > 0 {
                    bracket_depth -= 1;
                } else {
                    out.anomalies += 1;
                }
            }

            TokenKind::Block => {
                if paren_depth == 0 && bracket_depth == 0 {
                    if let Some(name) = pending_name.take() {
                        out.names.push(name);
                    }
                    last_ident = None;
                    paren_candidate = None;
                }
            }

            TokenKind::Semi | TokenKind::Comma | TokenKind::Assign => {
                if paren_depth == 0 && bracket_depth == 0 {
                    last_ident = None;
                    paren_candidate = None;
                    pending_name = None;
                }
            }
        }
        idx += 1;
    }

    out
}

/// Resolve an identifier through the macro table when it heads a call.
///
/// Returns the token index to resume at when the invocation's arguments
/// were consumed textually, or `None` to treat the identifier as plain.
fn handle_macro_ident(
    source: &str,
    tokens: &[Token],
    idx: usize,
    ident: &str,
    macros: &MacroTable,
    out: &mut TokenPassOutcome,
    last_ident: &mut Candidate,
) -> Option<usize> {
    let next = tokens.get(idx + 1)?;
    if next.kind != TokenKind::LParen {
        return None;
    }

    if let Some(def) = macros.find_name_template(ident) {
        if let Some((call_args, end)) = parse_call_args(source, next.span.start) {
            if call_args.len() == def.params.len() {
                if let Some(name) = def.render_name(&call_args) {
                    out.names.push(name);
                }
            }
            *last_ident = None;
            return Some(skip_past(tokens, idx + 1, end));
        }
    }

    if let Some(def) = macros.find_expansion(ident) {
        if let Some((call_args, end)) = parse_call_args(source, next.span.start) {
            if call_args.len() == def.params.len() {
                if let Some(expanded) = def.render_expansion(&call_args) {
                    *last_ident = Some(expanded);
                    return Some(skip_past(tokens, idx + 1, end));
                }
            }
        }
        return None;
    }

    // A registered macro with no usable template: inert call, arguments
    // consumed, nothing produced.
    if macros.find(ident).is_some() && macros.find_name_template(ident).is_none() {
        if let Some((_, end)) = parse_call_args(source, next.span.start) {
            *last_ident = None;
            return Some(skip_past(tokens, idx + 1, end));
        }
    }

    None
}

/// First token index at or after `from` whose span starts at or past
/// byte offset `end`.
fn skip_past(tokens: &[Token], from: usize, end: usize) -> usize {
    let mut idx = from;
    while idx < tokens.len() && tokens[idx].span.start < end {
        idx += 1;
    }
    idx
}
