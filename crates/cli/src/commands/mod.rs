pub mod chat;
pub mod reset;
pub mod status;
