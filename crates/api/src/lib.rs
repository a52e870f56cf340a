//! HTTP API for the grievance intake service.
//!
//! Exposes the chat intake flow plus complaint, department and analytics
//! endpoints over a shared [`AppState`].
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/chat` | One chat turn |
//! | POST | `/complaints` | File a complaint directly |
//! | GET | `/complaints` | List complaints (`status`, `limit`, `offset`) |
//! | GET | `/complaints/:reference` | Look up one complaint |
//! | PATCH | `/complaints/:reference/status` | Move a complaint through its lifecycle |
//! | GET, POST | `/departments` | List or add departments |
//! | GET | `/analytics` | Complaint counts |
//! | GET | `/health` | Liveness |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError, SessionBackend};
pub use error::{ApiError, Result};
pub use routes::router;
pub use state::AppState;
