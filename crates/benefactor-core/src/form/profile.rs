//! The donor profile form.
//!
//! Declares the built-in fields of the three profile sections, maps field
//! keys onto donor attributes, and assembles the final ordered structure.

use benefactor_types::donor::{meta, Donor, UserContext};
use benefactor_types::field::{
    Field, FieldGroup, FieldOption, FieldSet, FieldType, ProfileFields, ProfileSection,
};

use super::filter::{FilterContext, FilterPipeline};
use super::location::country_options;
use super::sort::{priority_sort, sort_profile};

/// Action name the profile nonce is bound to.
pub const NONCE_ACTION: &str = "charitable_user_profile";

/// Form field carrying the profile nonce.
pub const NONCE_FIELD: &str = "_charitable_user_profile_nonce";

/// Form field naming the action to run on submission.
pub const ACTION_FIELD: &str = "charitable_action";

/// Value of [`ACTION_FIELD`] for profile updates.
pub const FORM_ACTION: &str = "update_profile";

/// Where a profile field's value lives on the donor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonorAttribute {
    FirstName,
    LastName,
    Email,
    Meta(String),
}

impl DonorAttribute {
    /// Resolve the storage location of a form field.
    ///
    /// Keys without a built-in mapping are stored as meta under their own name.
    pub fn for_field(key: &str) -> Self {
        match key {
            "first_name" => DonorAttribute::FirstName,
            "last_name" => DonorAttribute::LastName,
            "user_email" => DonorAttribute::Email,
            "company" => DonorAttribute::Meta(meta::COMPANY.to_string()),
            "address" => DonorAttribute::Meta(meta::ADDRESS.to_string()),
            "address_2" => DonorAttribute::Meta(meta::ADDRESS_2.to_string()),
            "city" => DonorAttribute::Meta(meta::CITY.to_string()),
            "state" => DonorAttribute::Meta(meta::STATE.to_string()),
            "postcode" => DonorAttribute::Meta(meta::POSTCODE.to_string()),
            "country" => DonorAttribute::Meta(meta::COUNTRY.to_string()),
            "phone" => DonorAttribute::Meta(meta::PHONE.to_string()),
            other => DonorAttribute::Meta(other.to_string()),
        }
    }

    pub fn read<'a>(&self, donor: &'a Donor) -> &'a str {
        match self {
            DonorAttribute::FirstName => &donor.first_name,
            DonorAttribute::LastName => &donor.last_name,
            DonorAttribute::Email => &donor.email,
            DonorAttribute::Meta(key) => donor.get(key),
        }
    }

    pub fn write(&self, donor: &mut Donor, value: String) {
        match self {
            DonorAttribute::FirstName => donor.first_name = value,
            DonorAttribute::LastName => donor.last_name = value,
            DonorAttribute::Email => donor.email = value,
            DonorAttribute::Meta(key) => donor.set_meta(key.clone(), value),
        }
    }
}

/// Current donor value for a form field key.
pub fn donor_value(donor: &Donor, key: &str) -> String {
    DonorAttribute::for_field(key).read(donor).to_string()
}

/// Assembler for the profile form.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    pipeline: FilterPipeline,
    countries: Vec<FieldOption>,
}

impl ProfileForm {
    /// Create a form whose fields pass through `pipeline`.
    pub fn new(pipeline: FilterPipeline) -> Self {
        Self {
            pipeline,
            countries: country_options(),
        }
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    /// Built-in fields of one section, before any filter runs.
    pub fn section_defaults(&self, section: ProfileSection, donor: &Donor) -> FieldSet {
        match section {
            ProfileSection::User => user_fields(donor),
            ProfileSection::Address => address_fields(donor, &self.countries),
            ProfileSection::Social => social_fields(donor),
        }
    }

    /// Assemble the ordered profile form for `user`.
    ///
    /// Section filters run on each section's defaults, then each section is
    /// sorted; the combined groups go through the profile filters and are
    /// sorted; finally the global filters run and both levels are sorted once
    /// more so groups added late are ordered too.
    pub fn fields(&self, user: &UserContext, donor: &Donor) -> ProfileFields {
        let ctx = FilterContext { user, donor };

        let mut groups = ProfileFields::new();
        for section in ProfileSection::ALL {
            let fields = self
                .pipeline
                .apply_section(section, self.section_defaults(section, donor), &ctx);
            groups.insert(
                section.group_key(),
                FieldGroup::new(section.legend(), section.priority(), priority_sort(fields)),
            );
        }

        let groups = priority_sort(self.pipeline.apply_profile(groups, &ctx));
        let groups = sort_profile(self.pipeline.apply_global(groups, &ctx));

        tracing::debug!(
            anonymous = user.is_anonymous(),
            groups = groups.len(),
            fields = groups.values().map(|g| g.fields.len()).sum::<usize>(),
            "assembled profile fields"
        );

        groups
    }
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self::new(FilterPipeline::new())
    }
}

fn user_fields(donor: &Donor) -> FieldSet {
    FieldSet::new()
        .with(
            "first_name",
            Field::new("First name", FieldType::Text, 2)
                .required()
                .with_value(&donor.first_name),
        )
        .with(
            "last_name",
            Field::new("Last name", FieldType::Text, 4)
                .required()
                .with_value(&donor.last_name),
        )
        .with(
            "user_email",
            Field::new("Email", FieldType::Email, 6)
                .required()
                .with_value(&donor.email),
        )
        .with(
            "company",
            Field::new("Company", FieldType::Text, 8).with_value(donor.get(meta::COMPANY)),
        )
}

fn address_fields(donor: &Donor, countries: &[FieldOption]) -> FieldSet {
    FieldSet::new()
        .with(
            "address",
            Field::new("Address", FieldType::Text, 22).with_value(donor.get(meta::ADDRESS)),
        )
        .with(
            "address_2",
            Field::new("Address 2", FieldType::Text, 24).with_value(donor.get(meta::ADDRESS_2)),
        )
        .with(
            "city",
            Field::new("City", FieldType::Text, 26).with_value(donor.get(meta::CITY)),
        )
        .with(
            "state",
            Field::new("State", FieldType::Text, 28).with_value(donor.get(meta::STATE)),
        )
        .with(
            "postcode",
            Field::new("Postcode / ZIP code", FieldType::Text, 30)
                .with_value(donor.get(meta::POSTCODE)),
        )
        .with(
            "country",
            Field::new("Country", FieldType::Select, 32)
                .with_options(countries.to_vec())
                .with_value(donor.get(meta::COUNTRY)),
        )
        .with(
            "phone",
            Field::new("Phone", FieldType::Text, 34).with_value(donor.get(meta::PHONE)),
        )
}

fn social_fields(donor: &Donor) -> FieldSet {
    FieldSet::new()
        .with(
            "twitter",
            Field::new("Twitter", FieldType::Text, 42).with_value(donor.get(meta::TWITTER)),
        )
        .with(
            "facebook",
            Field::new("Facebook", FieldType::Text, 44).with_value(donor.get(meta::FACEBOOK)),
        )
}
