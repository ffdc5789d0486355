//! **tagbridge**: mirrors window-manager tags onto a status bar.
//!
//! The bridge subscribes to the window manager's event stream, keeps an
//! in-memory [`model::WorldModel`] of displays, windows and focus, maps
//! live displays onto a few stable bar [`slots`], and pushes per-tag
//! styling (active, occupied, vacant; focused or not) to the bar.
//!
//! # Architecture
//!
//! ```text
//! event source ─▶ event ─▶ model ─▶ slots ─▶ planner ─▶ driver ─▶ render target
//! ```
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::EventSource`] abstracts how event lines arrive, so the
//!   [`supervisor`] is not coupled to a specific window manager.
//! * [`traits::RenderTarget`] abstracts how bar commands are delivered,
//!   so the [`driver`] is not coupled to a specific bar.
//!
//! Concrete implementations live in [`yashiki`] (`yashiki subscribe`) and
//! [`ranma`] (the `ranma` bar CLI).

pub mod config;
pub mod driver;
pub mod event;
pub mod model;
pub mod palette;
pub mod planner;
pub mod ranma;
pub mod render;
pub mod session;
pub mod slots;
pub mod supervisor;
pub mod traits;
pub mod yashiki;
