//! External boundaries: where leads come from and how functions are invoked.

pub mod lead_source {
    pub use crate::lead_source::*;
}

pub mod function_event {
    pub use crate::function_event::*;
}
