// Routines for output
pub mod output;
// Routines for settings
pub mod settings;
