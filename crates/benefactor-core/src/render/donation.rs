//! Donation form page and the login prompt shown above it.

use std::fmt::Write;

use super::hooks::{RenderContext, Section, SectionHooks};
use super::html::{html_escape, render_fieldset};

/// Render the donation form.
///
/// Anonymous visitors get the [`Section::LoginForm`] hooks first. The form
/// body is made of the amount, user-field, and before-submit sections, in
/// that order, followed by the submit control.
pub fn render_donation_form(ctx: &RenderContext<'_>, hooks: &SectionHooks) -> String {
    let mut out = String::new();

    if ctx.user.is_anonymous() {
        hooks.render(Section::LoginForm, ctx, &mut out);
    }

    out.push_str(r#"<form method="post" action="/donate" id="charitable-donation-form" class="charitable-form">"#);
    hooks.render(Section::DonationFormAmount, ctx, &mut out);
    hooks.render(Section::DonationFormUserFields, ctx, &mut out);
    hooks.render(Section::BeforeSubmit, ctx, &mut out);
    out.push_str(
        r#"<div class="charitable-form-field charitable-submit-field"><input class="button button-primary" type="submit" name="donate" value="Donate" /></div>"#,
    );
    out.push_str("</form>");
    out
}

/// Login prompt for anonymous visitors; empty for everyone else.
pub fn render_login_prompt(ctx: &RenderContext<'_>) -> String {
    if !ctx.user.is_anonymous() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(
        r##"<p class="login-prompt"><a href="#" data-charitable-toggle="charitable-donation-login-form">Donated before? Log in before continuing.</a></p>"##,
    );
    out.push_str(
        r#"<div id="charitable-donation-login-form" class="charitable-login-form charitable-form">"#,
    );
    out.push_str(
        "<p>If you have donated before, please enter your details below to login. \
         If this is your first time, proceed to the donation form.</p>",
    );
    let _ = write!(
        out,
        r#"<form method="post" action="{}" class="charitable-login">"#,
        html_escape(ctx.login_url)
    );
    out.push_str(
        r#"<p class="login-username"><label for="user_login">Email</label><input type="email" name="email" id="user_login" required /></p>"#,
    );
    out.push_str(
        r#"<p class="login-code"><label for="user_code">Access code</label><input type="password" name="code" id="user_code" required /></p>"#,
    );
    out.push_str(
        r#"<p class="login-submit"><input type="submit" class="button button-primary" value="Log In" /></p>"#,
    );
    out.push_str("</form></div>");
    out
}

pub(super) fn login_form_hook(ctx: &RenderContext<'_>, out: &mut String) {
    out.push_str(&render_login_prompt(ctx));
}

pub(super) fn amount_hook(_ctx: &RenderContext<'_>, out: &mut String) {
    out.push_str(
        r#"<div id="charitable_field_amount" class="charitable-form-field charitable-form-field-amount required-field"><label for="charitable_field_amount_element">Donation amount <abbr class="required" title="required">*</abbr></label><input type="number" name="amount" id="charitable_field_amount_element" min="1" step="0.01" required /></div>"#,
    );
}

pub(super) fn user_fields_hook(ctx: &RenderContext<'_>, out: &mut String) {
    for (key, group) in ctx.user_fields.iter() {
        render_fieldset(out, key, group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefactor_types::donor::{Donor, UserContext, UserId};
    use benefactor_types::field::ProfileFields;

    use crate::form::profile::ProfileForm;

    fn render(user: UserContext, hooks: &SectionHooks) -> String {
        let fields: ProfileFields = ProfileForm::default().fields(&user, &Donor::anonymous());
        let ctx = RenderContext {
            user: &user,
            user_fields: &fields,
            login_url: "/login",
        };
        render_donation_form(&ctx, hooks)
    }

    #[test]
    fn test_anonymous_sees_login_prompt_first() {
        let html = render(UserContext::Anonymous, &SectionHooks::with_defaults());
        let prompt = html.find("Donated before? Log in before continuing.").unwrap();
        let form = html.find(r#"id="charitable-donation-form""#).unwrap();
        assert!(prompt < form);
        assert!(html.contains(r#"action="/login""#));
    }

    #[test]
    fn test_authenticated_has_no_login_prompt() {
        let html = render(
            UserContext::Authenticated(UserId::new()),
            &SectionHooks::with_defaults(),
        );
        assert!(!html.contains("login-prompt"));
        assert!(html.starts_with("<form"));
    }

    #[test]
    fn test_sections_render_in_order() {
        let html = render(UserContext::Anonymous, &SectionHooks::with_defaults());
        let amount = html.find(r#"name="amount""#).unwrap();
        let user_fields = html.find(r#"id="charitable-user_fields""#).unwrap();
        let address = html.find(r#"id="charitable-address_fields""#).unwrap();
        let submit = html.find(r#"name="donate""#).unwrap();
        assert!(amount < user_fields);
        assert!(user_fields < address);
        assert!(address < submit);
        assert!(html.ends_with("</form>"));
    }

    #[test]
    fn test_custom_hook_before_submit() {
        let hooks = SectionHooks::with_defaults().add(
            Section::BeforeSubmit,
            |_: &RenderContext<'_>, out: &mut String| out.push_str(r#"<p id="gift-aid">Gift Aid</p>"#),
        );
        let html = render(UserContext::Anonymous, &hooks);
        let gift_aid = html.find(r#"id="gift-aid""#).unwrap();
        let submit = html.find(r#"name="donate""#).unwrap();
        assert!(gift_aid < submit);
    }

    #[test]
    fn test_empty_hooks_render_bare_form() {
        let html = render(UserContext::Anonymous, &SectionHooks::new());
        assert_eq!(
            html,
            r#"<form method="post" action="/donate" id="charitable-donation-form" class="charitable-form"><div class="charitable-form-field charitable-submit-field"><input class="button button-primary" type="submit" name="donate" value="Donate" /></div></form>"#
        );
    }

    #[test]
    fn test_login_prompt_escapes_url() {
        let user = UserContext::Anonymous;
        let fields = ProfileFields::new();
        let ctx = RenderContext {
            user: &user,
            user_fields: &fields,
            login_url: "/login?next=\"x\"",
        };
        let html = render_login_prompt(&ctx);
        assert!(html.contains(r#"action="/login?next=&quot;x&quot;""#));
    }
}
