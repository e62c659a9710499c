//! Notification broker for the NovaDE desktop environment.
//!
//! Clients' requests arrive as [`NotificationRequest`]s, get an id from the
//! [`ReplacementEngine`], a visual from the [`ImageResolver`] and a display
//! duration from [`timeout::estimate`]. The outcome is published as
//! [`NotificationEvent`]s for whatever presents notifications on screen.

pub mod broker;
pub mod errors;
pub mod events;
pub mod hints;
pub mod identity;
pub mod image;
pub mod live_index;
pub mod replacement;
pub mod timeout;
pub mod types;

pub use broker::{DefaultNotificationBroker, NotificationBroker};
pub use errors::{NotificationError, NotificationResult};
pub use events::{NotificationEvent, ReceivedNotification};
pub use hints::{HintKey, HintValue, Hints, RawImageData};
pub use identity::IdAllocator;
pub use self::image::{DesktopEntryLookup, ImageBinding, ImageResolver, NoDesktopEntries};
pub use live_index::LiveNotificationIndex;
pub use replacement::{IdResolution, IdSource, ReplacementEngine};
pub use timeout::DisplayDuration;
pub use types::{
    CloseReason, NotificationAction, NotificationId, NotificationRequest, SenderKey, ServerInformation, CAPABILITIES,
};
