// crates/grid-manager-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI Catalog Tests
// Description: Unit tests for catalog integrity and substitution.
// Purpose: Ensure every message key is unique and renders its placeholders.
// Dependencies: grid-manager-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies catalog keys are unique, placeholders are well formed, and
//! translation substitutes named arguments.

use std::collections::BTreeSet;

use crate::i18n::MessageArg;
use crate::i18n::catalog;
use crate::i18n::catalog_entries;
use crate::i18n::translate;

fn placeholders_are_well_formed(template: &str) -> bool {
    let mut open = false;
    for ch in template.chars() {
        match (ch, open) {
            ('{', false) => open = true,
            ('}', true) => open = false,
            ('{' | '}', _) => return false,
            (ch, true) if !(ch.is_ascii_lowercase() || ch == '_') => return false,
            _ => {}
        }
    }
    !open
}

#[test]
fn catalog_keys_are_unique() {
    let mut seen = BTreeSet::new();
    for (key, _) in catalog_entries() {
        assert!(seen.insert(*key), "duplicate catalog key {key}");
    }
    assert_eq!(seen.len(), catalog().len());
}

#[test]
fn catalog_templates_have_valid_placeholder_syntax() {
    for (key, template) in catalog_entries() {
        assert!(placeholders_are_well_formed(template), "bad placeholders in {key}");
    }
}

#[test]
fn translate_substitutes_arguments() {
    let message = translate(
        "list.entry",
        vec![MessageArg::new("name", "zara"), MessageArg::new("key", "pub-v0-abc")],
    );
    assert_eq!(message, "zara: pub-v0-abc");
}

#[test]
fn macro_formats_display_values() {
    let message = crate::t!("main.version", version = 7);
    assert_eq!(message, "grid-manager 7");
}

#[test]
fn unknown_key_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}
