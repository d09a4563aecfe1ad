//! BoilerAI echo server.
//!
//! A local stand-in for the BoilerAI backend: it asks for an API key once at
//! startup, then answers `POST /query` by echoing the query back and reports
//! session status on `GET /health`. Used to exercise the frontend without a
//! real model behind it.

pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use session::{HealthStatus, QueryRequest, QueryResponse, Session};
pub use state::AppState;
