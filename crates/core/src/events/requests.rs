use serde::Deserialize;

use crate::serde::{deserialize_optional_string, deserialize_patch_string};

use super::{EventError, EventItem, EventStatus};

/// Body of `POST /api/events`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub link: Option<String>,
    #[serde(default)]
    pub registration_disabled: Option<bool>,
}

impl CreateEventRequest {
    /// Validates the request and builds the event under the given ID.
    pub fn into_event(self, id: impl Into<String>) -> Result<EventItem, EventError> {
        let (Some(title), Some(date)) = (self.title, self.date) else {
            return Err(EventError::MissingRequiredFields);
        };

        Ok(EventItem {
            id: id.into(),
            title,
            date,
            time: self.time,
            location: self.location,
            description: self.description,
            image: self.image,
            category: self.category,
            status: EventStatus::from_requested(self.status.as_deref()),
            link: self.link,
            registration_disabled: self.registration_disabled,
        })
    }
}

/// Body of `PUT /api/events`.
///
/// Absent fields keep the stored value; `null` or `""` clears an optional
/// field. `title` and `date` can be replaced but never cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_patch_string")]
    pub time: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_string")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_string")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_string")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_string")]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_patch_string")]
    pub link: Option<Option<String>>,
    #[serde(default)]
    pub registration_disabled: Option<bool>,
}

impl UpdateEventRequest {
    /// Returns the target event ID.
    pub fn id(&self) -> Result<&str, EventError> {
        self.id.as_deref().ok_or(EventError::MissingId)
    }

    /// Applies the provided fields to a stored event.
    ///
    /// The status only changes when the request carries a valid status.
    pub fn apply_to(&self, event: &mut EventItem) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(date) = &self.date {
            event.date = date.clone();
        }

        let patches = [
            (&self.time, &mut event.time),
            (&self.location, &mut event.location),
            (&self.description, &mut event.description),
            (&self.image, &mut event.image),
            (&self.category, &mut event.category),
            (&self.link, &mut event.link),
        ];
        for (patch, field) in patches {
            if let Some(value) = patch {
                *field = value.clone();
            }
        }

        if let Some(status) = self.status.as_deref().and_then(EventStatus::parse) {
            event.status = status;
        }
        if let Some(disabled) = self.registration_disabled {
            event.registration_disabled = Some(disabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(json: &str) -> CreateEventRequest {
        serde_json::from_str(json).unwrap()
    }

    fn update(json: &str) -> UpdateEventRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_requires_title_and_date() {
        let err = create(r#"{"title": "Gala"}"#).into_event("1").unwrap_err();
        assert_eq!(err, EventError::MissingRequiredFields);

        let err = create(r#"{"date": "2025-01-01"}"#).into_event("1").unwrap_err();
        assert_eq!(err, EventError::MissingRequiredFields);

        let err = create(r#"{"title": "", "date": "2025-01-01"}"#)
            .into_event("1")
            .unwrap_err();
        assert_eq!(err, EventError::MissingRequiredFields);
    }

    #[test]
    fn create_defaults_status_to_upcoming() {
        let event = create(r#"{"title": "Gala", "date": "2025-01-01", "status": "cancelled"}"#)
            .into_event("id-1")
            .unwrap();

        assert_eq!(event.id, "id-1");
        assert_eq!(event.status, EventStatus::Upcoming);
    }

    #[test]
    fn create_accepts_past_status_and_optional_fields() {
        let event = create(
            r#"{"title": "Gala", "date": "2024-01-01", "status": "past",
                "location": "Cherry Hill", "time": "", "registrationDisabled": true}"#,
        )
        .into_event("id-2")
        .unwrap();

        assert_eq!(event.status, EventStatus::Past);
        assert_eq!(event.location.as_deref(), Some("Cherry Hill"));
        assert_eq!(event.time, None);
        assert_eq!(event.registration_disabled, Some(true));
    }

    #[test]
    fn update_requires_id() {
        assert_eq!(update("{}").id(), Err(EventError::MissingId));
        assert_eq!(update(r#"{"id": "abc"}"#).id(), Ok("abc"));
    }

    #[test]
    fn update_overwrites_only_provided_fields() {
        let mut event = EventItem::new("abc", "Gala", "2025-01-01").with_location("Hall A");
        event.category = Some("Festival".to_string());

        update(r#"{"id": "abc", "title": "Spring Gala", "category": null}"#).apply_to(&mut event);

        assert_eq!(event.title, "Spring Gala");
        assert_eq!(event.date, "2025-01-01");
        assert_eq!(event.location.as_deref(), Some("Hall A"));
        assert_eq!(event.category, None);
    }

    #[test]
    fn update_ignores_invalid_status() {
        let mut event = EventItem::new("abc", "Gala", "2025-01-01").with_status(EventStatus::Past);

        update(r#"{"id": "abc", "status": "archived"}"#).apply_to(&mut event);
        assert_eq!(event.status, EventStatus::Past);

        update(r#"{"id": "abc", "status": "upcoming"}"#).apply_to(&mut event);
        assert_eq!(event.status, EventStatus::Upcoming);
    }

    #[test]
    fn update_cannot_clear_title() {
        let mut event = EventItem::new("abc", "Gala", "2025-01-01");
        update(r#"{"id": "abc", "title": ""}"#).apply_to(&mut event);
        assert_eq!(event.title, "Gala");
    }
}
