//! Shared utilities for the sitekit API.
//!
//! - [`email`]: The mailer abstraction and its SMTP implementation
//! - [`response`]: Response envelopes

pub mod email;
pub mod response;
