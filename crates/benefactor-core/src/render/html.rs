//! HTML building blocks: escaping, single fields, fieldsets, and the page shell.

use std::fmt::Write;

use benefactor_types::field::{Field, FieldGroup, FieldType};

/// Escape text for use in element content and double-quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Append a hidden input.
pub fn hidden_input(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        r#"<input type="hidden" name="{}" value="{}" />"#,
        html_escape(name),
        html_escape(value)
    );
}

/// Append the markup for one field.
///
/// Unknown field types are rendered as text inputs.
pub fn render_field(out: &mut String, key: &str, field: &Field) {
    if field.field_type == FieldType::Hidden {
        hidden_input(out, key, &field.value);
        return;
    }

    let input_type = match &field.field_type {
        FieldType::Other(name) => {
            tracing::debug!(key, field_type = %name, "unknown field type, rendering as text");
            "text"
        }
        known => known.as_str(),
    };

    let key = html_escape(key);
    let element_id = format!("charitable_field_{key}_element");
    let required_attr = if field.required { " required" } else { "" };
    let required_class = if field.required { " required-field" } else { "" };

    let _ = write!(
        out,
        r#"<div id="charitable_field_{key}" class="charitable-form-field charitable-form-field-{input_type}{required_class}">"#
    );
    let _ = write!(
        out,
        r#"<label for="{element_id}">{}"#,
        html_escape(&field.label)
    );
    if field.required {
        out.push_str(r#" <abbr class="required" title="required">*</abbr>"#);
    }
    out.push_str("</label>");

    match &field.field_type {
        FieldType::Select => {
            let _ = write!(out, r#"<select name="{key}" id="{element_id}"{required_attr}>"#);
            out.push_str(r#"<option value="">Select an option</option>"#);
            let options = field.options.as_deref().unwrap_or_default();
            if !field.value.is_empty() && !options.iter().any(|o| o.value == field.value) {
                let value = html_escape(&field.value);
                let _ = write!(out, r#"<option value="{value}" selected>{value}</option>"#);
            }
            for option in options {
                let selected = if option.value == field.value {
                    " selected"
                } else {
                    ""
                };
                let _ = write!(
                    out,
                    r#"<option value="{}"{selected}>{}</option>"#,
                    html_escape(&option.value),
                    html_escape(&option.label)
                );
            }
            out.push_str("</select>");
        }
        FieldType::Textarea => {
            let _ = write!(
                out,
                r#"<textarea name="{key}" id="{element_id}"{required_attr}>{}</textarea>"#,
                html_escape(&field.value)
            );
        }
        _ => {
            let _ = write!(
                out,
                r#"<input type="{input_type}" name="{key}" id="{element_id}" value="{}"{required_attr} />"#,
                html_escape(&field.value)
            );
        }
    }

    out.push_str("</div>");
}

/// Append a `<fieldset>` holding every field of `group`.
pub fn render_fieldset(out: &mut String, key: &str, group: &FieldGroup) {
    let _ = write!(
        out,
        r#"<fieldset id="charitable-{}" class="charitable-fieldset"><legend>{}</legend>"#,
        html_escape(key),
        html_escape(&group.legend)
    );
    for (field_key, field) in group.fields.iter() {
        render_field(out, field_key, field);
    }
    out.push_str("</fieldset>");
}

/// Kind of a notice shown above a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A notice box.
pub fn render_notice(kind: NoticeKind, message: &str) -> String {
    let class = match kind {
        NoticeKind::Success => "charitable-notice-success",
        NoticeKind::Error => "charitable-notice-error",
    };
    format!(
        r#"<div class="charitable-notice {class}"><p>{}</p></div>"#,
        html_escape(message)
    )
}

/// Wrap `body` in a minimal HTML document.
pub fn render_page(site_name: &str, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | {site_name}</title>
</head>
<body>
<main class="charitable-page">
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = html_escape(title),
        site_name = html_escape(site_name),
    )
}
