//! `atc-control` — the centralized sector controller.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`request`]       | `Request`, `RequestKind`                                  |
//! | [`request_queue`] | `RequestQueue` (bounded ring buffer), `QueueFull`         |
//! | [`wait_queue`]    | `PriorityWaitQueue`, `Waiter`, `Insert`                   |
//! | [`sector`]        | `Sector` (logical owner + physical claim), `SectorTable`  |
//! | [`signal`]        | `GrantSignal`, `GrantWait`                                |
//! | [`recovery`]      | `RecoveryState`, `RecoveryGuard`                          |
//! | [`airspace`]      | `Airspace` — the shared context handed to every thread    |
//! | [`controller`]    | `Controller`, `Arbitration`, `ControllerStats`            |
//! | [`error`]         | `ControlError`, `ControlResult<T>`                        |
//!
//! # Ownership model
//!
//! ```text
//!                ┌──────────────── Airspace (shared, &) ────────────────┐
//!  pilot threads │ RequestQueue  GrantSignal[M]  RecoveryState  Sectors │
//!                └──────────────────────────▲───────────────────────────┘
//!                                           │ &
//!                  Controller (moved into the controller thread, &mut)
//!                  └── PriorityWaitQueue[N + M]
//! ```
//!
//! The wait queues are owned by `Controller` and only reachable through
//! `&mut self`, so the compiler enforces that a single thread arbitrates.
//! Only the request queue, the grant signals, the recovery flag, and the
//! sectors' atomic words are touched from several threads.

pub mod airspace;
pub mod controller;
pub mod error;
pub mod recovery;
pub mod request;
pub mod request_queue;
pub mod sector;
pub mod signal;
pub mod wait_queue;


pub use airspace::Airspace;
pub use controller::{Arbitration, Controller, ControllerStats};
pub use error::{ControlError, ControlResult};
pub use recovery::{RecoveryGuard, RecoveryState};
pub use request::{Request, RequestKind};
pub use request_queue::{QueueFull, RequestQueue};
pub use sector::{Sector, SectorTable};
pub use signal::{GRANT_SLOTS, GrantSignal, GrantWait};
pub use wait_queue::{Insert, PriorityWaitQueue, Waiter};
