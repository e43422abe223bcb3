/// Game state machine: levels, session, tick.

pub mod event;
pub mod fade;
pub mod layout;
pub mod level;
pub mod session;
pub mod step;
