//! Portfolio content: what the page says, independent of how it moves.

pub mod profile;

pub use profile::Profile;
