// Budget domain handlers
pub mod budget_handler;
pub mod member_handler;
pub mod invite_handler;
