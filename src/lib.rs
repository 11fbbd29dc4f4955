// Library for tests to access modules

pub mod backend;
pub mod config;
pub mod models;
pub mod parse;
pub mod poller;
pub mod state;
pub mod tool_repo;
pub mod version;
