pub mod accounts;
pub mod admin;
pub mod app;
pub mod auth;
pub mod calculator;
pub mod user;
