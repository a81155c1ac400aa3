//! Community events: record types, request validation, display ordering and
//! the built-in catalogue of events published on the site.

mod error;
mod import;
mod ordering;
mod requests;
mod types;

pub use error::{event_error_to_status_code, EventError};
pub use import::{new_events_by_title_and_date, site_events, ImportSummary};
pub use ordering::{order_for_display, parse_event_date};
pub use requests::{CreateEventRequest, UpdateEventRequest};
pub use types::{EventItem, EventStatus};
