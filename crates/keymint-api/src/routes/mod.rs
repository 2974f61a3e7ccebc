//! # API Route Modules
//!
//! - `licenses` — the two license operations: issuance
//!   (`POST /generate_license`, authenticated) and validation
//!   (`POST /check_license`, open).

pub mod licenses;
