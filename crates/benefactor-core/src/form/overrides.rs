//! Field changes declared in `config.toml`.

use benefactor_types::config::FieldOverride;
use benefactor_types::field::{Field, FieldOption, FieldSet, FieldType, ProfileSection};

use super::filter::{FieldFilter, FilterContext};
use super::profile::donor_value;

/// Priority given to added fields that do not declare one.
const DEFAULT_ADDED_PRIORITY: i32 = 100;

/// Section filter applying operator-defined [`FieldOverride`]s.
pub struct ConfigOverrideFilter {
    overrides: Vec<FieldOverride>,
}

impl ConfigOverrideFilter {
    pub fn new(overrides: Vec<FieldOverride>) -> Self {
        Self { overrides }
    }

    fn apply(ov: &FieldOverride, mut fields: FieldSet, ctx: &FilterContext<'_>) -> FieldSet {
        if ov.remove {
            fields.remove(&ov.key);
            return fields;
        }

        if let Some(field) = fields.get_mut(&ov.key) {
            if let Some(label) = &ov.label {
                field.label = label.clone();
            }
            if let Some(options) = &ov.options {
                field.options = Some(options.clone());
            }
            if let Some(field_type) = &ov.field_type {
                if Self::select_without_options(field_type, field.options.as_deref()) {
                    tracing::warn!(
                        key = %ov.key,
                        section = %ov.section,
                        "field override makes a select without options, keeping the field type"
                    );
                } else {
                    field.field_type = field_type.clone();
                }
            }
            if let Some(priority) = ov.priority {
                field.priority = priority;
            }
            if let Some(required) = ov.required {
                field.required = required;
            }
            return fields;
        }

        let Some(label) = &ov.label else {
            tracing::warn!(
                key = %ov.key,
                section = %ov.section,
                "field override names an unknown field and has no label, skipping"
            );
            return fields;
        };

        let mut field_type = ov.field_type.clone().unwrap_or(FieldType::Text);
        if Self::select_without_options(&field_type, ov.options.as_deref()) {
            tracing::warn!(
                key = %ov.key,
                section = %ov.section,
                "added select field has no options, using a text input"
            );
            field_type = FieldType::Text;
        }

        let mut field = Field::new(
            label.clone(),
            field_type,
            ov.priority.unwrap_or(DEFAULT_ADDED_PRIORITY),
        );
        field.required = ov.required.unwrap_or(false);
        field.options = ov.options.clone();
        field.value = donor_value(ctx.donor, &ov.key);
        fields.insert(ov.key.clone(), field);
        fields
    }

    fn select_without_options(field_type: &FieldType, options: Option<&[FieldOption]>) -> bool {
        *field_type == FieldType::Select && options.is_none_or(<[FieldOption]>::is_empty)
    }
}

impl FieldFilter for ConfigOverrideFilter {
    fn name(&self) -> &str {
        "config-overrides"
    }

    fn filter_section(
        &self,
        section: ProfileSection,
        fields: FieldSet,
        ctx: &FilterContext<'_>,
    ) -> FieldSet {
        self.overrides
            .iter()
            .filter(|ov| ov.section == section)
            .fold(fields, |fields, ov| Self::apply(ov, fields, ctx))
    }
}
