//! Client side of the tracker: a typed view of the JSON API and the
//! dashboard state that fetches records and derives charts and insights.

pub mod api;
pub mod dashboard;

pub use api::{ClientError, ClientResult, HttpApi, TrackerApi};
pub use dashboard::{Dashboard, Notification, NotificationLevel};
