//! Profile form markup.

use benefactor_types::field::ProfileFields;

use super::html::{hidden_input, render_fieldset};
use crate::form::profile::{ACTION_FIELD, FORM_ACTION, NONCE_FIELD};

/// Render the profile form with one fieldset per group.
///
/// `nonce` is embedded as a hidden field and must be verified on submission.
pub fn render_profile_form(fields: &ProfileFields, nonce: &str) -> String {
    let mut out = String::new();
    out.push_str(
        r#"<form method="post" id="charitable-profile-form" class="charitable-form" action="/profile">"#,
    );
    hidden_input(&mut out, ACTION_FIELD, FORM_ACTION);
    hidden_input(&mut out, NONCE_FIELD, nonce);

    for (key, group) in fields.iter() {
        render_fieldset(&mut out, key, group);
    }

    out.push_str(
        r#"<div class="charitable-form-field charitable-submit-field"><input class="button button-primary" type="submit" name="update-profile" value="Update" /></div>"#,
    );
    out.push_str("</form>");
    out
}
