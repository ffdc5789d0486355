//! yashiki-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`EventSource`](crate::traits::EventSource) trait, powered by
//! `yashiki subscribe`.
//!
//! Nothing outside this module should reference yashiki directly.

pub mod subscribe;
