//! JSON API endpoints.

pub mod images;
