pub mod cards;
pub mod fields;
pub mod profile;

pub use cards::CardParser;
pub use fields::{member_id_from_href, parse_rating_text, text_of};
