//! Extension points over the profile field structure.
//!
//! A [`FilterPipeline`] is an ordered list of [`FieldFilter`]s. Each filter
//! takes the structure by value and returns the (possibly changed) structure,
//! so filters never share mutable state. Three granularities exist, applied
//! in this order during assembly:
//!
//! 1. **Section** -- one call per built-in section (`user`, `address`,
//!    `social`) over that section's [`FieldSet`].
//! 2. **Profile** -- one call over the combined [`ProfileFields`], where whole
//!    groups can be added, removed, or replaced.
//! 3. **Global** -- one final call over the sorted result.

use std::fmt;
use std::sync::Arc;

use benefactor_types::donor::{Donor, UserContext};
use benefactor_types::field::{FieldSet, ProfileFields, ProfileSection};

/// What a filter may inspect while transforming fields.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub user: &'a UserContext,
    pub donor: &'a Donor,
}

/// A transform over the profile field structure.
///
/// All stages default to the identity, so implementors override only the
/// granularity they care about.
pub trait FieldFilter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn filter_section(
        &self,
        _section: ProfileSection,
        fields: FieldSet,
        _ctx: &FilterContext<'_>,
    ) -> FieldSet {
        fields
    }

    fn filter_profile(&self, groups: ProfileFields, _ctx: &FilterContext<'_>) -> ProfileFields {
        groups
    }

    fn filter_global(&self, groups: ProfileFields, _ctx: &FilterContext<'_>) -> ProfileFields {
        groups
    }
}

/// Shared, type-erased filter.
pub type DynFieldFilter = Arc<dyn FieldFilter>;

struct SectionFn<F> {
    name: String,
    section: ProfileSection,
    f: F,
}

impl<F> FieldFilter for SectionFn<F>
where
    F: Fn(FieldSet, &FilterContext<'_>) -> FieldSet + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn filter_section(
        &self,
        section: ProfileSection,
        fields: FieldSet,
        ctx: &FilterContext<'_>,
    ) -> FieldSet {
        if section == self.section {
            (self.f)(fields, ctx)
        } else {
            fields
        }
    }
}

struct ProfileFn<F> {
    name: String,
    f: F,
}

impl<F> FieldFilter for ProfileFn<F>
where
    F: Fn(ProfileFields, &FilterContext<'_>) -> ProfileFields + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn filter_profile(&self, groups: ProfileFields, ctx: &FilterContext<'_>) -> ProfileFields {
        (self.f)(groups, ctx)
    }
}

struct GlobalFn<F> {
    name: String,
    f: F,
}

impl<F> FieldFilter for GlobalFn<F>
where
    F: Fn(ProfileFields, &FilterContext<'_>) -> ProfileFields + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn filter_global(&self, groups: ProfileFields, ctx: &FilterContext<'_>) -> ProfileFields {
        (self.f)(groups, ctx)
    }
}

/// Ordered chain of field filters.
///
/// Filters run in registration order at every stage.
#[derive(Clone, Default)]
pub struct FilterPipeline {
    filters: Vec<DynFieldFilter>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to the end of the chain.
    pub fn push(&mut self, filter: DynFieldFilter) {
        self.filters.push(filter);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, filter: DynFieldFilter) -> Self {
        self.push(filter);
        self
    }

    /// Register a closure for a single section.
    pub fn on_section<F>(self, name: impl Into<String>, section: ProfileSection, f: F) -> Self
    where
        F: Fn(FieldSet, &FilterContext<'_>) -> FieldSet + Send + Sync + 'static,
    {
        self.with(Arc::new(SectionFn {
            name: name.into(),
            section,
            f,
        }))
    }

    /// Register a closure over the combined groups.
    pub fn on_profile<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ProfileFields, &FilterContext<'_>) -> ProfileFields + Send + Sync + 'static,
    {
        self.with(Arc::new(ProfileFn {
            name: name.into(),
            f,
        }))
    }

    /// Register a closure over the final, sorted structure.
    pub fn on_global<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ProfileFields, &FilterContext<'_>) -> ProfileFields + Send + Sync + 'static,
    {
        self.with(Arc::new(GlobalFn {
            name: name.into(),
            f,
        }))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn apply_section(
        &self,
        section: ProfileSection,
        fields: FieldSet,
        ctx: &FilterContext<'_>,
    ) -> FieldSet {
        self.filters.iter().fold(fields, |fields, filter| {
            tracing::trace!(filter = filter.name(), %section, "applying section filter");
            filter.filter_section(section, fields, ctx)
        })
    }

    pub fn apply_profile(&self, groups: ProfileFields, ctx: &FilterContext<'_>) -> ProfileFields {
        self.filters.iter().fold(groups, |groups, filter| {
            tracing::trace!(filter = filter.name(), "applying profile filter");
            filter.filter_profile(groups, ctx)
        })
    }

    pub fn apply_global(&self, groups: ProfileFields, ctx: &FilterContext<'_>) -> ProfileFields {
        self.filters.iter().fold(groups, |groups, filter| {
            tracing::trace!(filter = filter.name(), "applying global filter");
            filter.filter_global(groups, ctx)
        })
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefactor_types::field::{Field, FieldGroup, FieldType};

    fn ctx_parts() -> (UserContext, Donor) {
        (UserContext::Anonymous, Donor::anonymous())
    }

    #[test]
    fn test_section_filter_only_touches_its_section() {
        let pipeline = FilterPipeline::new().on_section(
            "add-nickname",
            ProfileSection::User,
            |mut fields, _ctx| {
                fields.insert("nickname", Field::new("Nickname", FieldType::Text, 5));
                fields
            },
        );
        let (user, donor) = ctx_parts();
        let ctx = FilterContext {
            user: &user,
            donor: &donor,
        };

        let user_fields = pipeline.apply_section(ProfileSection::User, FieldSet::new(), &ctx);
        let social_fields = pipeline.apply_section(ProfileSection::Social, FieldSet::new(), &ctx);
        assert!(user_fields.contains_key("nickname"));
        assert!(social_fields.is_empty());
    }

    #[test]
    fn test_filters_run_in_registration_order() {
        let pipeline = FilterPipeline::new()
            .on_section("rename", ProfileSection::Social, |mut fields, _ctx| {
                if let Some(f) = fields.get_mut("twitter") {
                    f.label = "X".to_string();
                }
                fields
            })
            .on_section("suffix", ProfileSection::Social, |mut fields, _ctx| {
                if let Some(f) = fields.get_mut("twitter") {
                    f.label.push_str(" (Twitter)");
                }
                fields
            });
        let (user, donor) = ctx_parts();
        let ctx = FilterContext {
            user: &user,
            donor: &donor,
        };

        let fields = FieldSet::new().with("twitter", Field::new("Twitter", FieldType::Text, 42));
        let out = pipeline.apply_section(ProfileSection::Social, fields, &ctx);
        assert_eq!(out.get("twitter").unwrap().label, "X (Twitter)");
    }

    #[test]
    fn test_profile_and_global_stages_are_separate() {
        let pipeline = FilterPipeline::new()
            .on_profile("drop-social", |mut groups, _ctx| {
                groups.remove("social_fields");
                groups
            })
            .on_global("add-notes", |mut groups, _ctx| {
                groups.insert("notes", FieldGroup::new("Notes", 50, FieldSet::new()));
                groups
            });
        let (user, donor) = ctx_parts();
        let ctx = FilterContext {
            user: &user,
            donor: &donor,
        };

        let groups = ProfileFields::new()
            .with("social_fields", FieldGroup::new("Social", 40, FieldSet::new()));
        let after_profile = pipeline.apply_profile(groups, &ctx);
        assert!(after_profile.is_empty());

        let after_global = pipeline.apply_global(after_profile, &ctx);
        assert_eq!(after_global.keys().collect::<Vec<_>>(), vec!["notes"]);
    }

    #[test]
    fn test_debug_lists_filter_names() {
        let pipeline = FilterPipeline::new()
            .on_profile("first", |g, _| g)
            .on_global("second", |g, _| g);
        assert_eq!(format!("{pipeline:?}"), r#"["first", "second"]"#);
        assert_eq!(pipeline.len(), 2);
    }
}
