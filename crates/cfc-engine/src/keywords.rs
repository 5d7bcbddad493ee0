//! C keyword classification tables.
//!
//! Three overlapping sets drive the recognizer and the macro renderer:
//!
//! - *Declaration keywords*: storage classes, base types, qualifiers,
//!   function/alignment specifiers and common compiler extensions. Seeing
//!   one at top level means a new declarator is starting.
//! - *Control keywords*: flow-control words that can never be a function
//!   name and must clear the candidate identifier.
//! - *C keywords*: the full reserved-word list, used to reject rendered
//!   macro names that would collide with the language.

/// Storage-class, type, qualifier and specifier keywords, including the
/// GCC/MSVC spellings that show up in real-world headers.
pub const DECL_KEYWORDS: &[&str] = &[
    "typedef",
    "extern",
    "static",
    "auto",
    "register",
    "_Thread_local",
    "__thread",
    "void",
    "char",
    "short",
    "int",
    "long",
    "float",
    "double",
    "signed",
    "unsigned",
    "_Bool",
    "_Complex",
    "_Imaginary",
    "struct",
    "union",
    "enum",
    "const",
    "volatile",
    "restrict",
    "_Atomic",
    "inline",
    "_Noreturn",
    "_Alignas",
    "typeof",
    "__typeof__",
    "__const",
    "__volatile__",
    "__restrict",
    "__restrict__",
    "__inline",
    "__inline__",
    "__alignas",
    "__alignas__",
    "__attribute__",
    "__attribute",
    "__declspec",
    "__asm__",
    "__asm",
    "asm",
];

/// Flow-control keywords. A candidate identifier equal to one of these is
/// never a function name.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue", "return",
    "goto", "sizeof",
];

/// The full C reserved-word list (C11), used to reject rendered macro names.
pub const C_KEYWORDS: &[&str] = &[
    "auto",
    "break",
    "case",
    "char",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "struct",
    "switch",
    "typedef",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Bool",
    "_Complex",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

/// True if `ident` starts a declaration (storage class, type, qualifier,
/// specifier or compiler-extension keyword).
#[must_use]
pub fn is_decl_keyword(ident: &str) -> bool {
    DECL_KEYWORDS.contains(&ident)
}

/// True if `ident` is a flow-control keyword.
#[must_use]
pub fn is_control_keyword(ident: &str) -> bool {
    CONTROL_KEYWORDS.contains(&ident)
}

/// True if `ident` is reserved by the C language.
#[must_use]
pub fn is_c_keyword(ident: &str) -> bool {
    C_KEYWORDS.contains(&ident)
}

/// True if `s` is a syntactically valid C identifier
/// (`[A-Za-z_][A-Za-z0-9_]*`).
#[must_use]
pub fn is_valid_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return false;
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn keyword_sets_overlap_as_expected() {
        // "static" declares, "return" controls, both are reserved.
        assert!(is_decl_keyword("static"));
        assert!(!is_decl_keyword("return"));
        assert!(is_control_keyword("return"));
        assert!(!is_control_keyword("static"));
        assert!(is_c_keyword("static"));
        assert!(is_c_keyword("return"));
    }

    #[rstest]
    #[case("__attribute__")]
    #[case("__declspec")]
    #[case("__asm__")]
    #[case("typeof")]
    #[case("_Thread_local")]
    fn compiler_extensions_are_declaration_keywords(#[case] keyword: &str) {
        assert!(is_decl_keyword(keyword));
    }

    #[rstest]
    #[case("foo", true)]
    #[case("_bar9", true)]
    #[case("_", true)]
    #[case("", false)]
    #[case("9lives", false)]
    #[case("a-b", false)]
    #[case("a b", false)]
    fn identifier_validity(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(is_valid_identifier(input), valid);
    }
}
