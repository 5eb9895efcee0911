use crate::grouper::Group;
use crate::template::Wildcard;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A merged, user-facing template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// 1-based, in discovery order.
    pub template_id: usize,
    pub template: String,
    /// Event IDs of every group folded into this template.
    pub event_ids: Vec<String>,
    /// Events across all member groups.
    pub count: usize,
}

/// Folds groups whose normalized templates coincide.
///
/// The first group to produce a given text creates the template and fixes its
/// ID; later groups only extend its event IDs and count. Output keeps
/// discovery order. A group with no template yet merges as the empty template.
pub fn merge_groups(groups: &[Group], wildcard: &Wildcard) -> Vec<Template> {
    let mut by_text: AHashMap<String, usize> = AHashMap::new();
    let mut templates: Vec<Template> = Vec::new();

    for group in groups {
        let normalized = wildcard.normalize(group.template().unwrap_or_default());
        match by_text.get(&normalized) {
            Some(&slot) => {
                let tmpl = &mut templates[slot];
                tmpl.event_ids.push(group.event_id.clone());
                tmpl.count += group.len();
            }
            None => {
                by_text.insert(normalized.clone(), templates.len());
                templates.push(Template {
                    template_id: templates.len() + 1,
                    template: normalized,
                    event_ids: vec![group.event_id.clone()],
                    count: group.len(),
                });
            }
        }
    }

    templates
}
