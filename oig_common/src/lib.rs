mod secret;

pub mod helpers;

pub use helpers::bounded_note;
pub use secret::Secret;
