pub mod candidates;
pub mod config;
pub mod eco;
pub mod error;
pub mod features;
pub mod inference;
pub mod planner;
pub mod predictors;
pub mod request;
pub mod route;
pub mod service;
pub mod validation;
