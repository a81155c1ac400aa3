use std::collections::HashSet;

use serde::Serialize;

use super::EventItem;

const SITE_EVENTS_JSON: &str = include_str!("site_events.json");

/// Outcome of importing the site catalogue into the event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub total: usize,
}

/// The events published on the public site before the CMS existed.
pub fn site_events() -> Vec<EventItem> {
    serde_json::from_str(SITE_EVENTS_JSON).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Built-in site events catalogue is malformed");
        Vec::new()
    })
}

/// Returns the incoming events whose `title|date` key is not present in
/// `existing`, in incoming order.
pub fn new_events_by_title_and_date(
    existing: &[EventItem],
    incoming: &[EventItem],
) -> Vec<EventItem> {
    let existing_keys: HashSet<String> = existing.iter().map(EventItem::import_key).collect();

    incoming
        .iter()
        .filter(|e| !existing_keys.contains(&e.import_key()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStatus;

    #[test]
    fn site_catalogue_parses() {
        let events = site_events();
        assert_eq!(events.len(), 8);
        assert_eq!(events[0].id, "static-1");
        assert_eq!(events[0].link.as_deref(), Some("/scholarship"));
        assert_eq!(
            events.iter().filter(|e| e.status == EventStatus::Upcoming).count(),
            2
        );
    }

    #[test]
    fn skips_events_with_matching_title_and_date() {
        let existing = vec![EventItem::new("mine", "Community Service Day", "2024-11-12")];
        let incoming = vec![
            EventItem::new("static-6", "Community Service Day", "2024-11-12"),
            EventItem::new("static-8", "Community Service Day", "2023-11-12"),
        ];

        let added = new_events_by_title_and_date(&existing, &incoming);

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, "static-8");
    }

    #[test]
    fn importing_twice_adds_nothing_the_second_time() {
        let catalogue = site_events();
        let first = new_events_by_title_and_date(&[], &catalogue);
        assert_eq!(first.len(), catalogue.len());

        let second = new_events_by_title_and_date(&first, &catalogue);
        assert!(second.is_empty());
    }
}
