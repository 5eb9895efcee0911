use crate::parser::Event;
use ahash::AHashMap;
use once_cell::sync::OnceCell;

/// All events sharing one event ID.
///
/// Membership is fixed at construction. The template is a write-once cell:
/// the worker that synthesizes it is its only writer, everything after the
/// scheduler barrier only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub event_id: String,
    /// Indices into the parse result's event list, in input order.
    pub members: Vec<usize>,
    template: OnceCell<String>,
}

impl Group {
    pub fn new(event_id: impl Into<String>, members: Vec<usize>) -> Self {
        Self {
            event_id: event_id.into(),
            members,
            template: OnceCell::new(),
        }
    }

    /// A group whose template was produced elsewhere.
    pub fn with_template(
        event_id: impl Into<String>,
        members: Vec<usize>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            members,
            template: OnceCell::with_value(template.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn template(&self) -> Option<&str> {
        self.template.get().map(String::as_str)
    }

    /// Stores the synthesized template. A second write is refused and the
    /// rejected value handed back.
    pub fn set_template(&self, template: String) -> Result<(), String> {
        self.template.set(template)
    }

    pub fn token_strings<'a>(&'a self, events: &'a [Event]) -> Vec<&'a str> {
        self.members
            .iter()
            .filter_map(|&i| events.get(i))
            .map(|ev| ev.token_string.as_str())
            .collect()
    }
}

/// Partitions events by event ID.
///
/// Groups come back ordered by the line ID of their first member so that
/// template IDs are assigned in the same order on every run.
pub fn group_events(events: &[Event]) -> Vec<Group> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for (i, ev) in events.iter().enumerate() {
        match index.get(ev.event_id.as_str()) {
            Some(&g) => groups[g].members.push(i),
            None => {
                index.insert(ev.event_id.as_str(), groups.len());
                groups.push(Group::new(ev.event_id.clone(), vec![i]));
            }
        }
    }

    groups.sort_by_key(|g| g.members.first().map(|&i| events[i].line_id));
    groups
}
