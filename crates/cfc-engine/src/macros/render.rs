//! Template rendering against call-site arguments.

use crate::keywords;

use super::TemplatePart;

/// Substitute call arguments into a paste template and validate the
/// result as a function name.
///
/// Arguments have their whitespace stripped entirely (`a b` pastes as
/// `ab`), matching how `##` joins preprocessing tokens. The rendered
/// string must be a valid C identifier and must not be a reserved word;
/// anything else, or an argument-count mismatch, yields `None`.
pub(super) fn render(
    parts: &[TemplatePart],
    params: &[String],
    call_args: &[String],
) -> Option<String> {
    if call_args.len() != params.len() {
        return None;
    }

    let mut out = String::new();
    for part in parts {
        match part {
            TemplatePart::Literal(text) => out.push_str(text),
            TemplatePart::Param(name) => {
                if let Some(idx) = params.iter().position(|p| p == name) {
                    out.extend(call_args[idx].chars().filter(|c| !c.is_whitespace()));
                }
            }
        }
    }

    if keywords::is_valid_identifier(&out) && !keywords::is_c_keyword(&out) {
        Some(out)
    } else {
        None
    }
}
