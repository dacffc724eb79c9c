//! Admin order management.
//!
//! There is no admin authentication; these pages are meant to run behind a
//! private network or proxy.

pub mod orders;
