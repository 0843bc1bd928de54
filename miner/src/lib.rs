//! Worker-thread mining harness.
//!
//! Workers loop over nonces against the current work, starting from a
//! uniformly random nonce and wrapping upward, and poll a control channel
//! between attempts so a stop request lands within one attempt. Found seals
//! are reported over a channel together with the pow hash they answer.

mod worker;

pub use crate::worker::{start_worker, EthashSimple, Worker, WorkerController, WorkerMessage};
