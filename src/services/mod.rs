pub mod catalog;
pub mod game;
pub mod language;
pub mod reading_list;
pub mod rounds;
