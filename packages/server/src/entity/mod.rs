pub mod decision_log;
pub mod resource;
pub mod user;
