//! # Coffee shop drinks server
//! This crate hosts the HTTP server for the coffee shop drinks menu. It is responsible for:
//! * Serving the menu to the public, with the secret ingredient names left out.
//! * Verifying the bearer tokens presented to protected routes, and checking that they carry the required permission.
//! * Passing valid changes to the menu on to the [`coffee_shop_engine`].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /drinks`: The public menu.
//! * `GET /drinks-detail`: The full menu. Requires `get:drinks-detail`.
//! * `POST /drinks`: Adds a drink. Requires `post:drinks`.
//! * `PATCH /drinks/{id}`: Updates a drink. Requires `patch:drinks`.
//! * `DELETE /drinks/{id}`: Removes a drink. Requires `delete:drinks`.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;
