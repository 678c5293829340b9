pub mod config;
pub mod global;
pub mod logging;
pub mod randroll;
pub mod render;
pub mod roll;
pub mod rollcounts;
pub mod rolliter;
pub mod session;
pub mod sim;
pub mod table;
