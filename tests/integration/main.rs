//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no sockets
//! (except `udp_link_tests`, which uses loopback) and no real time.

mod control_loop_tests;
mod udp_link_tests;
