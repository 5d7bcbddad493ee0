//! Reconciliation of the two recognition passes.
//!
//! The token pass is precise but macro-blind in spots; the text pass has
//! better macro recall but counts every conditional-compilation branch.
//! Token-pass names whose name the text pass already derived through a
//! macro are dropped, the text pass's macro-derived lists are added, and
//! that union forms a multiset of claims. The text pass's source-ordered
//! list is emitted while claims remain, then any claims the text pass
//! never saw are appended.

use std::collections::{HashMap, HashSet};

use crate::textscan::ScanOutcome;

/// Merge both passes into one final, source-ordered name list.
#[must_use]
pub fn reconcile(token_pass: &[String], scan: &ScanOutcome) -> Vec<String> {
    // The text pass's macro lists claim those definitions themselves;
    // an identical token-pass name would count the same occurrence
    // twice. A name only the token pass found keeps its claim, macro
    // or not.
    let macro_names: HashSet<&str> = scan
        .macro_named
        .iter()
        .chain(scan.macro_template.iter())
        .map(String::as_str)
        .collect();

    let target: Vec<&String> = token_pass
        .iter()
        .filter(|name| !macro_names.contains(name.as_str()))
        .chain(scan.macro_named.iter())
        .chain(scan.macro_template.iter())
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &target {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut merged = Vec::new();
    for name in &scan.ordered {
        if let Some(remaining) = counts.get_mut(name.as_str()) {
            if *remaining > 0 {
                merged.push(name.clone());
                *remaining -= 1;
            }
        }
    }

    if counts.values().any(|&n| n > 0) {
        for name in target {
            if let Some(remaining) = counts.get_mut(name.as_str()) {
                if *remaining > 0 {
                    merged.push(name.clone());
                    *remaining -= 1;
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn scan_with(ordered: &[&str], macro_named: &[&str], macro_template: &[&str]) -> ScanOutcome {
        ScanOutcome {
            ordered: strs(ordered),
            macro_named: strs(macro_named),
            macro_template: strs(macro_template),
        }
    }

    #[test]
    fn agreement_passes_through_in_scan_order() {
        let tokens = strs(&["a", "b"]);
        let scan = scan_with(&["a", "b"], &[], &[]);
        assert_eq!(reconcile(&tokens, &scan), vec!["a", "b"]);
    }

    #[test]
    fn scan_order_wins_over_token_order() {
        let tokens = strs(&["b", "a"]);
        let scan = scan_with(&["a", "b"], &[], &[]);
        assert_eq!(reconcile(&tokens, &scan), vec!["a", "b"]);
    }

    #[test]
    fn names_only_the_token_pass_found_are_appended() {
        let tokens = strs(&["a", "hidden"]);
        let scan = scan_with(&["a"], &[], &[]);
        assert_eq!(reconcile(&tokens, &scan), vec!["a", "hidden"]);
    }

    #[test]
    fn scan_only_names_without_a_claim_are_dropped() {
        // The text pass sees both branches of an #if/#else; the token
        // pass claims the name once, so it appears once.
        let tokens = strs(&["pick"]);
        let scan = scan_with(&["pick", "pick"], &[], &[]);
        assert_eq!(reconcile(&tokens, &scan), vec!["pick"]);
    }

    #[test]
    fn duplicate_claims_keep_their_multiplicity() {
        let tokens = strs(&["dup", "dup"]);
        let scan = scan_with(&["dup", "other", "dup"], &[], &[]);
        assert_eq!(reconcile(&tokens, &scan), vec!["dup", "dup"]);
    }

    #[test]
    fn macro_names_are_claimed_by_the_text_pass() {
        let tokens = strs(&["test_alpha", "plain", "scale_16"]);
        let scan = scan_with(
            &["test_alpha", "plain", "scale_16"],
            &["scale_16"],
            &["test_alpha"],
        );
        assert_eq!(
            reconcile(&tokens, &scan),
            vec!["test_alpha", "plain", "scale_16"]
        );
    }

    #[test]
    fn macro_name_seen_only_by_the_token_pass_is_appended() {
        // A rendered name the text pass never derived still belongs to
        // the token pass; it must not vanish from the output.
        let tokens = strs(&["test_ghost", "real"]);
        let scan = scan_with(&["real"], &[], &[]);
        assert_eq!(reconcile(&tokens, &scan), vec!["real", "test_ghost"]);
    }

    #[test]
    fn a_shared_macro_name_never_double_counts() {
        let tokens = strs(&["gen_a"]);
        let scan = scan_with(&["gen_a"], &[], &["gen_a"]);
        assert_eq!(reconcile(&tokens, &scan), vec!["gen_a"]);
    }

    #[test]
    fn empty_passes_merge_to_empty() {
        assert_eq!(
            reconcile(&[], &ScanOutcome::default()),
            Vec::<String>::new()
        );
    }
}
