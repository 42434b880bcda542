//! REST backend for a personal to-do application, plus a typed client and a
//! predictable state container that mirror the server's data.

pub mod auth;
pub mod client;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod notification;
pub mod response;
pub mod routes;
pub mod state;
pub mod todo;
pub mod user;

#[cfg(test)]
mod tests;
