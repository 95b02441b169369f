//! Render-time extension points of the donation form.
//!
//! Each [`Section`] is a named slot in the page. Hooks registered for a slot
//! run in registration order and append markup to the output buffer.

use std::fmt;
use std::sync::Arc;

use benefactor_types::donor::UserContext;
use benefactor_types::field::ProfileFields;

/// Named slots of the donation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Above the form, rendered only for anonymous visitors.
    LoginForm,
    /// Donation amount entry.
    DonationFormAmount,
    /// Donor details.
    DonationFormUserFields,
    /// Just before the submit control.
    BeforeSubmit,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::LoginForm => "login_form",
            Section::DonationFormAmount => "donation_form_amount",
            Section::DonationFormUserFields => "donation_form_user_fields",
            Section::BeforeSubmit => "donation_form_before_submit",
        };
        f.write_str(name)
    }
}

/// Data available to hooks while the page renders.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub user: &'a UserContext,
    pub user_fields: &'a ProfileFields,
    pub login_url: &'a str,
}

/// Markup producer for a [`Section`].
pub trait SectionHook: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut String);
}

impl<F> SectionHook for F
where
    F: Fn(&RenderContext<'_>, &mut String) + Send + Sync,
{
    fn render(&self, ctx: &RenderContext<'_>, out: &mut String) {
        self(ctx, out)
    }
}

/// Registry of section hooks.
#[derive(Clone, Default)]
pub struct SectionHooks {
    hooks: Vec<(Section, Arc<dyn SectionHook>)>,
}

impl SectionHooks {
    /// An empty registry; every section renders nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock login prompt, amount entry, and donor fieldsets.
    pub fn with_defaults() -> Self {
        Self::new()
            .add(Section::LoginForm, super::donation::login_form_hook)
            .add(Section::DonationFormAmount, super::donation::amount_hook)
            .add(Section::DonationFormUserFields, super::donation::user_fields_hook)
    }

    /// Register `hook` at the end of `section`'s list.
    pub fn add(mut self, section: Section, hook: impl SectionHook + 'static) -> Self {
        self.hooks.push((section, Arc::new(hook)));
        self
    }

    pub fn count(&self, section: Section) -> usize {
        self.hooks.iter().filter(|(s, _)| *s == section).count()
    }

    /// Run every hook registered for `section`.
    pub fn render(&self, section: Section, ctx: &RenderContext<'_>, out: &mut String) {
        for (_, hook) in self.hooks.iter().filter(|(s, _)| *s == section) {
            hook.render(ctx, out);
        }
        tracing::trace!(%section, "rendered section hooks");
    }
}

impl fmt::Debug for SectionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|(section, _)| section))
            .finish()
    }
}
