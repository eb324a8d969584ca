//! Search lifecycle.
//!
//! One search interaction moves through `Idle → Loading → (Failed | Ready)`
//! and can be restarted from any settled state. [`SearchLifecycle`] is the
//! synchronous state machine; [`SearchDriver`] runs it against a
//! [`RouteFetcher`](crate::fetcher::RouteFetcher).
//!
//! Every accepted search gets a [`RequestToken`]. A fetch result is only
//! applied if its token is still the one in flight, so late answers from
//! cancelled or superseded searches are dropped.

mod driver;
mod machine;
mod state;

pub use driver::{PendingSearch, SearchDriver};
pub use machine::{InFlightPolicy, Resolution, SearchLifecycle, SubmitError, Submission};
pub use state::{RequestToken, SearchState};
