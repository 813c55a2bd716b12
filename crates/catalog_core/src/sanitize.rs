/// Used when sanitizing leaves nothing behind.
pub const FALLBACK_BASENAME: &str = "item";

/// Deterministic, cross-format base filename.
///
/// Lower-cases, collapses whitespace runs into one `_`, then drops every
/// character that is not ASCII alphanumeric, `_` or `-`. Idempotent.
pub fn sanitize_filename(name: &str) -> String {
    sanitize_with(name, |c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Base name for the single-product YAML file: as [`sanitize_filename`] but
/// hyphens are dropped too, and `.yaml` is always appended.
pub fn sanitize_product_filename(name: &str) -> String {
    let base = sanitize_with(name, |c| c.is_ascii_alphanumeric() || c == '_');
    format!("{base}.yaml")
}

fn sanitize_with(name: &str, keep: impl Fn(char) -> bool) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if keep(c) {
            out.push(c);
        }
    }
    if out.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        out
    }
}
