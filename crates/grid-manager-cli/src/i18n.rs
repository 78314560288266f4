// crates/grid-manager-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and translation helpers for the CLI.
// Purpose: Centralize user-facing strings behind stable keys.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Grid Manager CLI stores user-facing strings in a small catalog so
//! wording stays consistent across commands. All runtime output should be
//! routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "grid-manager {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("input.kind.certificate", "certificate"),
    ("input.kind.servers", "server snapshot"),
    ("input.read_failed", "Failed to read {kind} from {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it exceeds {limit} bytes.",
    ),
    ("store.load_failed", "Failed to load Grid Manager config: {error}"),
    ("store.save_failed", "Failed to save Grid Manager config: {error}"),
    ("create.failed", "Failed to create Grid Manager: {error}"),
    ("add.failed", "Failed to add storage server: {error}"),
    ("sign.failed", "Failed to sign certificate: {error}"),
    ("sign.expiry_invalid", "Invalid certificate lifetime: {error}"),
    ("sign.write_failed", "Failed to write certificate file: {error}"),
    ("sign.written", "Wrote certificate to {path}"),
    ("sign.serialize_failed", "Failed to render certificate: {error}"),
    ("list.entry", "{name}: {key}"),
    ("install.failed", "Failed to install certificate: {error}"),
    ("install.done", "Installed certificate '{name}' at {path}"),
    ("placement.config_failed", "Failed to load client config: {error}"),
    ("placement.audit_failed", "Failed to open audit sink: {error}"),
    ("placement.servers_invalid", "Invalid server snapshot: {error}"),
    ("placement.rejected", "Upload rejected: {error}"),
    ("placement.serialize_failed", "Failed to render placement plan: {error}"),
];

/// Returns the raw catalog entries.
#[must_use]
pub const fn catalog_entries() -> &'static [(&'static str, &'static str)] {
    CATALOG_EN
}

/// Returns the message catalog keyed by message id.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
