pub mod config_io;
pub mod http;
pub mod logging;
pub mod page_io;
pub mod session;
