//! Host-surface wiring for the `pull-loader` crate.
//!
//! The `pull-loader` crate is UI-agnostic and only does the math and the state machine. This
//! crate adds the glue a list component needs on top of a scrolling surface:
//!
//! - registering and removing touch listeners (with a once-per-process passive-listener probe)
//! - routing touch, scroll, transition-end and footer-tap events
//! - a memoized visible slice and a per-row render callback
//! - change notification when the rendered frame actually changes
//!
//! This crate is intentionally framework-agnostic: implement [`Surface`] for your scroll element.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod error;
mod frame;
mod passive;
mod surface;


pub use controller::{Controller, ControllerBuilder, OnFrameChange, RenderRow};
pub use error::AdapterError;
pub use frame::{EventResponse, Frame};
pub use passive::passive_listeners_supported;
pub use surface::{
    GestureKind, HostEvent, ListenerOptions, Surface, TouchEvent, TouchPoint, TransitionTarget,
};
