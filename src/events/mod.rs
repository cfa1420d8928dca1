//! Event stream and continuations produced by the reducer.
//!
//! ## Key Types
//!
//! - `GameEvent`: what an accepted action did
//! - `Continuation`: deferred follow-up the host schedules
//! - `Dispatch`: everything one transition returns

mod event;
mod dispatch;

pub use event::GameEvent;
pub use dispatch::{Continuation, Dispatch, Refusal};
