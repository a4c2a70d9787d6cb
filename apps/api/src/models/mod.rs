pub mod package;
pub mod request;
