pub mod controller;
pub mod middleware;
pub mod model;
pub mod response;
pub mod service;
