//! Template renderer adapters.

pub mod case;
mod inflect;
mod jinja;

pub use inflect::Inflections;
pub use jinja::MiniJinjaRenderer;
