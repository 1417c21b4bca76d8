// External clients
pub mod mailer;

pub use mailer::*;
