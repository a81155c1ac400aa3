use serde::{Deserialize, Deserializer, Serialize};

/// Whether an event is still ahead or already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Past,
}

impl EventStatus {
    /// Parses an exact status string, returning `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(Self::Upcoming),
            "past" => Some(Self::Past),
            _ => None,
        }
    }

    /// Status for a new event: `past` only when explicitly requested.
    pub fn from_requested(value: Option<&str>) -> Self {
        match value {
            Some("past") => Self::Past,
            _ => Self::Upcoming,
        }
    }

    /// Status of a stored record: only an explicit `upcoming` is upcoming.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("upcoming") => Self::Upcoming,
            _ => Self::Past,
        }
    }
}

// Stored files are hand-edited from time to time; an unknown status must not
// make the whole file unreadable.
impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(Self::from_stored(value.as_deref()))
    }
}

fn missing_status() -> EventStatus {
    EventStatus::from_stored(None)
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Past => write!(f, "past"),
        }
    }
}

/// A community event shown on the events page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: String,
    pub title: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "missing_status")]
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_disabled: Option<bool>,
}

impl EventItem {
    /// Creates an upcoming event with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            time: None,
            location: None,
            description: None,
            image: None,
            category: None,
            status: EventStatus::Upcoming,
            link: None,
            registration_disabled: None,
        }
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Key used to recognise the same event across imports.
    pub fn import_key(&self) -> String {
        format!("{}|{}", self.title, self.date)
    }
}
