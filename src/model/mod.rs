pub mod language;
pub mod state;
