/// Draw command set and its client-side validation.
pub mod command;
