pub mod error;
pub mod flags;
pub mod models;
pub mod posts;
pub mod projection;
pub mod state;
pub mod timeline;
pub mod topology;
pub mod visibility;
