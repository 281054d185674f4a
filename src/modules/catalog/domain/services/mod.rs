pub mod certification;

pub use certification::{select_certification, PREFERRED_COUNTRIES};
