//! ranma-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`RenderTarget`](crate::traits::RenderTarget) trait, driving the bar
//! through its `ranma` command-line client.
//!
//! Nothing outside this module should reference ranma's CLI directly.

pub mod cli;
