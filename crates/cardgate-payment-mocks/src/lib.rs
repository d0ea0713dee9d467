//! Mock implementations for cardgate-payment testing.
//!
//! - [`MockTransport`]: scripted gateway responses keyed by method and path,
//!   with every request recorded
//! - [`MockChallengeWidget`]: in-memory challenge widget that fires its events
//!   on cue
//! - [`MockScriptLoader`]: hands out a [`MockChallengeWidget`], or fails/hangs
//!   when told to

pub mod transport;
pub mod widget;

pub use transport::{MockTransport, mock_id};
pub use widget::{MockChallengeWidget, MockScriptLoader, WidgetCall};
