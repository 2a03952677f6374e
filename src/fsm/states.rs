//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  RESTARTING ──[warm-up elapsed]──▶ READY ◀──[DisableSafeMode]──┐
//!      │                               │                          │
//!      │                 [5 rejections | EnableSafeMode]          │
//!      │                               ▼                          │
//!      └────────[EnableSafeMode]──▶ SAFE_MODE ────────────────────┘
//!                                      │
//!                               [3 rejections]
//!                                      ▼
//!                                  BBQ_MODE   (terminal)
//! ```
//!
//! The rejection thresholds are exact-equality checks against
//! `Counters::commands_rejected`, which only ever moves by one.

use super::context::FsmContext;
use super::{OperatingMode, StateDescriptor};
use log::{error, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; OperatingMode::COUNT] {
    [
        // Index 0 — Restarting
        StateDescriptor {
            id: OperatingMode::Restarting,
            on_enter: Some(restarting_enter),
            on_exit: None,
            on_update: restarting_update,
            terminal: false,
        },
        // Index 1 — Ready
        StateDescriptor {
            id: OperatingMode::Ready,
            on_enter: Some(ready_enter),
            on_exit: None,
            on_update: ready_update,
            terminal: false,
        },
        // Index 2 — SafeMode
        StateDescriptor {
            id: OperatingMode::SafeMode,
            on_enter: Some(safe_mode_enter),
            on_exit: Some(safe_mode_exit),
            on_update: safe_mode_update,
            terminal: false,
        },
        // Index 3 — BbqMode
        StateDescriptor {
            id: OperatingMode::BbqMode,
            on_enter: Some(bbq_mode_enter),
            on_exit: None,
            on_update: bbq_mode_update,
            terminal: true,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  RESTARTING
// ═══════════════════════════════════════════════════════════════════════════

fn restarting_enter(ctx: &mut FsmContext) {
    info!("RESTARTING: warm-up for {}s", ctx.config.warmup_secs);
}

fn restarting_update(ctx: &mut FsmContext) -> Option<OperatingMode> {
    if ctx.elapsed >= ctx.warmup() {
        return Some(OperatingMode::Ready);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  READY
// ═══════════════════════════════════════════════════════════════════════════

fn ready_enter(_ctx: &mut FsmContext) {
    info!("READY: accepting commands");
}

fn ready_update(ctx: &mut FsmContext) -> Option<OperatingMode> {
    if ctx.counters.commands_rejected == ctx.config.ready_rejection_limit {
        warn!(
            "READY: {} consecutive rejections, escalating",
            ctx.counters.commands_rejected
        );
        return Some(OperatingMode::SafeMode);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SAFE_MODE
// ═══════════════════════════════════════════════════════════════════════════

fn safe_mode_enter(ctx: &mut FsmContext) {
    ctx.counters.safe_mode_entries = ctx.counters.safe_mode_entries.wrapping_add(1);
    warn!(
        "SAFE_MODE: entered (entry #{})",
        ctx.counters.safe_mode_entries
    );
}

fn safe_mode_exit(_ctx: &mut FsmContext) {
    info!("SAFE_MODE: cleared");
}

fn safe_mode_update(ctx: &mut FsmContext) -> Option<OperatingMode> {
    if ctx.counters.commands_rejected == ctx.config.safe_rejection_limit {
        warn!(
            "SAFE_MODE: {} consecutive rejections, escalating",
            ctx.counters.commands_rejected
        );
        return Some(OperatingMode::BbqMode);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BBQ_MODE — terminal
// ═══════════════════════════════════════════════════════════════════════════

fn bbq_mode_enter(ctx: &mut FsmContext) {
    error!(
        "BBQ_MODE: entered after {} rejections, no further transitions",
        ctx.counters.commands_rejected
    );
}

fn bbq_mode_update(_ctx: &mut FsmContext) -> Option<OperatingMode> {
    None
}
