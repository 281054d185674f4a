mod movie;
mod movie_info;

pub use movie::*;
pub use movie_info::*;
