//! Property-test strategies for the constellation workspace
//!
//! Orbital and geometric value generators shared by every crate's tests.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn latitude_in_range(lat in latitude_deg()) {
//!         prop_assert!((-90.0..=90.0).contains(&lat));
//!     }
//! }
//! ```

pub mod generators;
pub mod runner;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::runner::FuzzConfig;
    pub use proptest::prelude::*;
}

pub use proptest;
