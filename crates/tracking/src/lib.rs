//! Order-status streaming protocols.
//!
//! Two independent delivery models over the order store:
//!
//! - [`StatusStreamer`] — server streaming: one request, a fixed
//!   time-paced sequence of status events, then stream close. A
//!   simulation generator, deliberately independent of the order's
//!   persisted status.
//! - [`interactive_tracking`] — bidirectional streaming: a per-client
//!   session that answers tracking queries and drives an auto-advance
//!   timer after subscription.
//!
//! Sessions and watch producers are isolated per call: each owns its own
//! task, channel, and timer, so any number of clients can stream
//! concurrently.

pub mod error;
pub mod messages;
pub mod session;
pub mod status_stream;
pub mod timeline;

pub use error::TrackingError;
pub use messages::{QueryKind, ResponseKind, StatusEvent, TrackingQuery, TrackingResponse};
pub use session::interactive_tracking;
pub use status_stream::StatusStreamer;
pub use timeline::{AUTO_ADVANCE, AUTO_ADVANCE_PERIOD, STATUS_TIMELINE};
