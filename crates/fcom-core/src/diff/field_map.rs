use crate::diff::model::{ChangeAction, StagedDiffSection};
use crate::model::EVENT_PREFIX;
use std::collections::BTreeMap;

/// `objectName -> (fieldName -> action)` for every event field change of a
/// named object.
///
/// Global sections are skipped. When an object appears in more than one
/// section, later sections overwrite earlier ones field by field.
pub fn build_field_change_map(
    sections: &[StagedDiffSection],
) -> BTreeMap<String, BTreeMap<String, ChangeAction>> {
    let mut map: BTreeMap<String, BTreeMap<String, ChangeAction>> = BTreeMap::new();
    for section in sections {
        let Some(object_name) = &section.object_name else {
            continue;
        };
        for change in &section.field_changes {
            let Some(field) = change.target.as_str().strip_prefix(EVENT_PREFIX) else {
                continue;
            };
            map.entry(object_name.clone())
                .or_default()
                .insert(field.to_string(), change.action);
        }
    }
    map
}
