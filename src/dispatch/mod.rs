//! Dispatch module
//!
//! Owns the pending-stop set and the next-stop selection policy.
//! Has no dependency on the transport layer.

mod queue;

pub use queue::StopQueue;
