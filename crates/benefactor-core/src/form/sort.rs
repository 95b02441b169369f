//! Stable ascending sort by display priority.

use benefactor_types::field::{FieldGroup, KeyedList, Prioritized, ProfileFields};

/// Sort entries by ascending priority.
///
/// The sort is stable: entries with equal priority keep the order in which
/// they were declared.
pub fn priority_sort<T: Prioritized>(mut list: KeyedList<T>) -> KeyedList<T> {
    list.sort_stable_by_key(|v| v.priority());
    list
}

/// Sort the groups of a profile form and the fields inside each group.
pub fn sort_profile(groups: ProfileFields) -> ProfileFields {
    priority_sort(groups)
        .into_iter()
        .map(|(key, group)| {
            let FieldGroup {
                legend,
                priority,
                fields,
            } = group;
            (key, FieldGroup::new(legend, priority, priority_sort(fields)))
        })
        .collect()
}
