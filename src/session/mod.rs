/// Client-side session state machine.
pub mod client;
