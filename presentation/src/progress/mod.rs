//! Pending-request indicator

pub mod reporter;
