/// Game simulation: session state, the turn state machine, and the
/// session controller that loops over them.

pub mod controller;
pub mod event;
pub mod session;
pub mod turn;

#[cfg(test)]
pub mod fake;
