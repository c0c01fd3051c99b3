pub mod html;

pub use html::{decode_entities, parse_page};
