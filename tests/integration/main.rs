//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one part of the node
//! against the mock board and the loopback framework.  Everything runs
//! on the host with no hardware attached.

mod config_tests;
mod dispatch_tests;
mod lifecycle_tests;
mod mock_hw;
