pub mod entities;
pub mod propagation;
pub mod requests;
pub mod responses;
pub mod weekday;
