pub mod config;
pub mod logging;

pub mod content_type;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod item_list;
pub mod launcher;
pub mod plan;
