//! Tree implementations and the traits they share.

pub mod traits;
pub mod tombstone;
