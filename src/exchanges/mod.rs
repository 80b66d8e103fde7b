pub mod futures;
pub mod spot;
