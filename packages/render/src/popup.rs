//! Field-interpolated popup and label templates.
//!
//! Templates reference attribute fields as `{field_name}`. Values are
//! HTML-escaped; missing or null fields interpolate to an empty string.

use transit_map_source_models::Attributes;

/// Renders a `{field}` template against a feature's attribute record.
#[must_use]
pub fn render_template(template: &str, attributes: &Attributes) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                out.push_str(&field_text(attributes.get(&after[..end])));
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated brace: emit literally.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Converts one attribute value to escaped display text.
fn field_text(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => escape_html(s),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => escape_html(&other.to_string()),
    }
}

/// Escapes text for safe inclusion in popup HTML.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
