pub mod details;
pub mod entities;
pub mod requests;
pub mod responses;
