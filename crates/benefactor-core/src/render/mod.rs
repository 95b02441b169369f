//! Built-in HTML rendering of the profile and donation forms.

pub mod donation;
pub mod hooks;
pub mod html;
pub mod profile;

pub use donation::{render_donation_form, render_login_prompt};
pub use hooks::{RenderContext, Section, SectionHook, SectionHooks};
pub use profile::render_profile_form;
