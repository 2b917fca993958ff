//! Adapter utilities for the `glidepane` crate.
//!
//! The `glidepane` crate is UI-agnostic and focuses on the math and state. This crate provides
//! small, framework-neutral helpers commonly needed by adapters:
//!
//! - A frame-driven controller for a collapsing header bridged to a scrolling body
//! - Separator drag tracking for split containers
//!
//! No UI toolkit bindings live here.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod separator;


pub use controller::{HeaderController, HeaderFrame};
pub use separator::SeparatorDrag;
