//! # keymint-core — License Domain Logic
//!
//! Pure domain logic for the keymint license service, shared by the API
//! layer and its tests. No I/O, no async, no persistence:
//!
//! - [`key`] — random license key generation (10 characters, A–Z and 0–9).
//! - [`duration`] — license duration parsing (`"lifetime"` or
//!   `"<integer> month"`) and expiration computation.
//!
//! Expiration arithmetic treats a month as exactly 30 days. There is no
//! calendar awareness (leap years, variable month lengths); the fixed-day
//! rule is part of the wire contract.

pub mod duration;
pub mod key;

pub use duration::{Duration, DurationError};
pub use key::{generate_key, KEY_LENGTH};
