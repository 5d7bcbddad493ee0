//! Function-like macro definitions and the per-file macro table.
//!
//! A `#define NAME(a, b) body` line is analyzed twice, independently:
//!
//! - a *name template* is extracted when the body looks like a function
//!   definition whose name is pasted from literals and parameters
//!   (`#define DEF(x) void test_##x(void) { ... }` yields `test_` + `x`);
//! - an *expansion template* is extracted when the whole body is a pure
//!   `##` paste chain (`#define FN(x) x##_impl` yields `x` + `_impl`).
//!
//! A macro may carry neither, one, or both. Rendering substitutes
//! whitespace-stripped call arguments into the template and only accepts
//! results that are valid, non-reserved C identifiers.

mod args;
mod body;
mod render;

pub use args::parse_call_args;

use crate::lexer::{Token, TokenKind};

/// One piece of a paste template: literal text or a parameter reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Param(String),
}

/// A registered function-like macro.
#[derive(Debug, Clone)]
pub struct MacroDef {
    pub name: String,
    pub params: Vec<String>,
    pub name_template: Option<Vec<TemplatePart>>,
    pub expansion_template: Option<Vec<TemplatePart>>,
}

impl MacroDef {
    /// Render the function-name template against call arguments.
    #[must_use]
    pub fn render_name(&self, call_args: &[String]) -> Option<String> {
        render::render(self.name_template.as_deref()?, &self.params, call_args)
    }

    /// Render the expansion template against call arguments.
    #[must_use]
    pub fn render_expansion(&self, call_args: &[String]) -> Option<String> {
        render::render(self.expansion_template.as_deref()?, &self.params, call_args)
    }
}

/// All function-like macros seen in one file. Built fresh per file.
#[derive(Debug, Default)]
pub struct MacroTable {
    defs: Vec<MacroDef>,
}

impl MacroTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `#define` surfaced by the lexer into a table.
    #[must_use]
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut table = Self::new();
        for token in tokens {
            if let TokenKind::PpDefine(line) = &token.kind {
                table.register(line);
            }
        }
        table
    }

    /// Parse one continuation-joined `#define` line and store it.
    ///
    /// Lines that are not function-like (no parameter list, zero
    /// parameters, or an unclosed parameter list) are dropped; a later
    /// identifier with that name is then just an ordinary identifier.
    pub fn register(&mut self, line: &str) {
        if let Some(def) = parse_define_line(line) {
            self.defs.push(def);
        }
    }

    /// Newest-registered-first lookup by macro name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&MacroDef> {
        self.defs.iter().rev().find(|def| def.name == name)
    }

    /// Newest macro with this name that carries a name template.
    #[must_use]
    pub fn find_name_template(&self, name: &str) -> Option<&MacroDef> {
        self.defs
            .iter()
            .rev()
            .find(|def| def.name == name && def.name_template.is_some())
    }

    /// Newest macro with this name that carries an expansion template.
    #[must_use]
    pub fn find_expansion(&self, name: &str) -> Option<&MacroDef> {
        self.defs
            .iter()
            .rev()
            .find(|def| def.name == name && def.expansion_template.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }
}

/// Parse `# define NAME ( a, b ) body`. A space between the name and `(`
/// is tolerated even though strict preprocessor grammar forbids it.
fn parse_define_line(line: &str) -> Option<MacroDef> {
    let bytes = line.as_bytes();
    let mut i = 0;

    let skip_ws = |bytes: &[u8], mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };
    let take_word = |bytes: &[u8], mut i: usize| {
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        i
    };

    i = skip_ws(bytes, i);
    if bytes.get(i) != Some(&b'#') {
        return None;
    }
    i = skip_ws(bytes, i + 1);
    if !bytes[i..].starts_with(b"define") {
        return None;
    }
    i += 6;

    i = skip_ws(bytes, i);
    let name_start = i;
    if i >= bytes.len() || !(bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
        return None;
    }
    i = take_word(bytes, i);
    let name = line[name_start..i].to_string();

    i = skip_ws(bytes, i);
    if bytes.get(i) != Some(&b'(') {
        return None;
    }
    i += 1;

    let mut params = Vec::new();
    while i < bytes.len() && bytes[i] != b')' {
        i = skip_ws(bytes, i);
        let start = i;
        i = take_word(bytes, i);
        if start != i {
            params.push(line[start..i].to_string());
        }
        i = skip_ws(bytes, i);
        if bytes.get(i) == Some(&b',') {
            i += 1;
            continue;
        }
        // Skip anything unexpected up to the next separator.
        while i < bytes.len() && bytes[i] != b',' && bytes[i] != b')' {
            i += 1;
        }
    }
    if bytes.get(i) != Some(&b')') {
        return None;
    }
    if params.is_empty() {
        return None;
    }
    let macro_body = line[i + 1..].trim();

    let non_empty = |parts: Option<Vec<TemplatePart>>| parts.filter(|p| !p.is_empty());
    Some(MacroDef {
        name_template: non_empty(body::extract_name_template(macro_body, &params)),
        expansion_template: non_empty(body::extract_expansion_template(macro_body, &params)),
        name,
        params,
    })
}
