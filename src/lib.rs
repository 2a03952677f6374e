//! Flight software command processor library.
//!
//! Exposes the pure-logic modules (command set, FSM, flight service, wire
//! codec) together with the host adapters and the control loop, for the
//! `fsw` and `gcs` binaries and for integration testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod comms;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod fsm;
