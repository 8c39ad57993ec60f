//! End-to-end reconciliation tests.
//!
//! Every test runs full context passes against an in-memory database and
//! checks both the reported deltas and the committed state.

mod cascade;
mod common;
mod filtering;
mod identity;
mod scenario;
mod source;
mod verify;
