//! End-to-end extraction over realistic C sources.

use cfc_engine::extract_from_source;
use pretty_assertions::assert_eq;

#[test]
fn mixed_real_world_file() {
    let src = r#"
#include <stdio.h>
#include "codec.h"

#define VERSION 3
#define DECLARE_WRITE(type) static void write_##type(Ctx *c) { emit(c); }
#define FN(n) n##_default

static const int table[4] = { 1, 2, 3, 4 };

int add(int a, int b);

int add(int a, int b) {
    return a + b; /* } not a real close */
}

DECLARE_WRITE(float)
DECLARE_WRITE(int32)

static char *FN(label)(void) {
    return "fn(\"quoted\")";
}

struct packet { int size; };

int main(void) {
    if (add(1, 2) > 2) {
        printf("{%d}\n", add(3, 4));
    }
    return 0;
}
"#;
    assert_eq!(
        extract_from_source(src),
        vec!["add", "write_float", "write_int32", "label_default", "main"]
    );
}

#[test]
fn multi_line_macro_definitions() {
    let src = "
#define DEFINE_SHOW(section)              \\
    static void show_##section(void)      \\
    {                                     \\
        render(#section);                 \\
    }

DEFINE_SHOW(format)
DEFINE_SHOW(streams)
";
    assert_eq!(
        extract_from_source(src),
        vec!["show_format", "show_streams"]
    );
}

#[test]
fn conditional_branches_keep_both_definitions() {
    let src = "
#if HAVE_FAST_PATH
int pick(void) { return 1; }
#else
int pick(void) { return 2; }
#endif
";
    assert_eq!(extract_from_source(src), vec!["pick", "pick"]);
}

#[test]
fn truncated_tail_does_not_lose_earlier_names() {
    let src = "
void done(void) { ok(); }
void broken(void) { unterminated(
";
    assert_eq!(extract_from_source(src), vec!["done"]);
}

#[test]
fn attributes_and_storage_specifiers_survive() {
    let src = "
static inline __attribute__((always_inline)) int clamp8(int v) {
    return v < 0 ? 0 : v;
}
";
    assert_eq!(extract_from_source(src), vec!["clamp8"]);
}

#[test]
fn non_ascii_text_is_tolerated() {
    let src = "
/* café © comment */
static const char *greeting = \"héllo\";
int touché(void) { return 1; }
int plain(void) { return 2; }
";
    // Identifiers are ASCII runs, so the accented name truncates at the
    // first multibyte character; the surrounding file still parses.
    assert_eq!(extract_from_source(src), vec!["touch", "plain"]);
}

#[test]
fn rename_macro_shadowing_uses_the_newest_definition() {
    let src = "
#define FN(n) n##_8
static void FN(blur)(void) { pass(); }
#define FN(n) n##_16
static void FN(blur)(void) { pass(); }
";
    assert_eq!(extract_from_source(src), vec!["blur_16", "blur_16"]);
}

#[test]
fn comment_between_macro_name_and_arguments_still_records() {
    // The token stream skips the comment, so only the token pass sees
    // this as a template invocation; the name must survive the merge.
    let src = "
#define DECLARE_TEST(x) void test_##x(void) { body(); }
DECLARE_TEST /* generated */ (alpha)
";
    assert_eq!(extract_from_source(src), vec!["test_alpha"]);
}

#[test]
fn empty_and_functionless_sources() {
    assert_eq!(extract_from_source(""), Vec::<String>::new());
    assert_eq!(
        extract_from_source("int x;\nstruct s { int v; };\n"),
        Vec::<String>::new()
    );
}
