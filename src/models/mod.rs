pub mod market;
pub mod response;
