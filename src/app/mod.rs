//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the flight rules: the command set and its
//! per-mode legality, FSM orchestration, counter bookkeeping and
//! reply assembly.  All interaction with the OS happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without sockets or real time.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
