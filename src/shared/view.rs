//! View-state building blocks shared by every feature machine.
//!
//! - [`Epoch`] / [`Ticket`]: per-machine cancellation. A machine hands out a
//!   ticket when it issues a request and bumps its epoch on every transition;
//!   results carrying a stale ticket are dropped instead of applied.
//! - [`Loadable`]: the list/detail fetch lifecycle.
//! - [`Toast`]: transient notices with a display deadline.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

// ─── Epoch / Ticket ──────────────────────────────────────────────────────────

/// Generation counter owned by one view-state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Epoch {
    generation: u64,
}

/// Proof that a request was issued during a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a request issued now.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    /// Abandon all outstanding tickets.
    pub fn advance(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation == ticket.0
    }
}

// ─── Loadable ────────────────────────────────────────────────────────────────

/// Fetch lifecycle for a list or singleton. A failure is terminal for the
/// current mount.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// ─── Toast ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl Toast {
    pub const DEFAULT_TTL_SECS: i64 = 4;

    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Utc::now(),
            ttl: Duration::seconds(Self::DEFAULT_TTL_SECS),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.shown_at + self.ttl
    }
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// `done / total` as a percentage clamped to `0..=100`. Zero totals yield 0.
pub fn progress_percent(done: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (done / total * Decimal::ONE_HUNDRED)
        .max(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
}
