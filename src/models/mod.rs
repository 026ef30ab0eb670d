//! Data models for the site content service.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod defaults;
mod login;
mod site_content;

pub use defaults::*;
pub use login::*;
pub use site_content::*;
