pub mod analytics;
pub mod request;
pub mod response;
