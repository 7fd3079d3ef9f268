//! Application core: domain logic with all I/O behind ports.
//!
//! The business rules for the thing node: action dispatch, the reset
//! gesture, inventory registration and the link lifecycle.  Hardware and
//! the framework are reached only through the traits in [`ports`].

pub mod actions;
pub mod events;
pub mod handler;
pub mod inventory;
pub mod ports;
pub mod reset;
pub mod router;
pub mod service;
