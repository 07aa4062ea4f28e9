pub mod chat;
pub mod config_cmd;
pub mod docs;
pub mod doctor;
pub mod onboard;
