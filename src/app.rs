//! Application module: the model the TUI and runtime work on.
//!
//! `App` lives in `app::model`, the notification projection in
//! `app::reflector` and key bindings in `app::input`.

mod input;
mod model;
mod reflector;

pub use input::{Action, KeyState};
pub use model::*;
pub use reflector::Reflector;

#[cfg(test)]
mod tests;
