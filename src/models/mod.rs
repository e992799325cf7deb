pub mod date;
pub mod poll;
