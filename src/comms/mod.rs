//! Command link: wire codec and transport port.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ┌───────────┐   ┌─────────┐   ┌──────────────────────┐  │
//! │  │ Transport │──▶│  Codec  │──▶│ FlightService        │  │
//! │  │ (trait)   │   │ decode  │   │ validate · execute   │  │
//! │  └───────────┘   └─────────┘   └──────────────────────┘  │
//! │        ▲                                  │              │
//! │        │          ┌─────────┐             │              │
//! │        └──────────│  Reply  │◀────────────┘              │
//! │                   └─────────┘                            │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod transport;
