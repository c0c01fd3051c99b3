pub mod classify;
pub mod debounce;
pub mod filter;
pub mod filter_controller;
pub mod highlight;
pub mod toggle;
pub mod token;
pub mod url_state;
