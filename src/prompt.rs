//! Prompt template rendering
//!
//! Templates contain `{{name}}` placeholders plus `{{#if name}}...{{/if}}`
//! guards around sections that only make sense when an optional field is
//! present. Substitution is literal; the destination is a natural-language
//! prompt, so no escaping is applied.

/// Render `template` against a set of named field values. An absent or
/// empty value drops its guarded sections entirely and substitutes bare
/// placeholders with the empty string. Guards do not nest.
pub fn render(template: &str, values: &[(&str, Option<&str>)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{#if ") {
        out.push_str(&substitute(&rest[..start], values));
        let after_open = &rest[start + 6..];

        let Some(name_end) = after_open.find("}}") else {
            // Unterminated guard; emit verbatim and stop scanning.
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = after_open[..name_end].trim();
        let body_and_rest = &after_open[name_end + 2..];

        let Some(close) = body_and_rest.find("{{/if}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        if lookup(values, name).is_some() {
            out.push_str(&substitute(&body_and_rest[..close], values));
        }
        rest = &body_and_rest[close + 7..];
    }

    out.push_str(&substitute(rest, values));
    out
}

/// Replace every `{{name}}` placeholder with its field value, or the empty
/// string when the field is absent.
fn substitute(text: &str, values: &[(&str, Option<&str>)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after_open[..end].trim();
        if let Some(value) = lookup(values, name) {
            out.push_str(value);
        }
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

/// A field counts as present only when it is set and non-empty.
fn lookup<'a>(values: &[(&str, Option<&'a str>)], name: &str) -> Option<&'a str> {
    values
        .iter()
        .find(|(n, _)| *n == name)
        .and_then(|(_, v)| *v)
        .filter(|v| !v.trim().is_empty())
}
