//! Application core for a public-transit route viewer/editor: proximity
//! ranking of routes against the viewer's position, and the session /
//! authorization gate. The UI shell, the backend REST API, the device
//! geolocation provider and the credential store are collaborators wired
//! in by the host.

pub mod catalog;
pub mod config;
pub mod guard;
pub mod models;
pub mod notify;
pub mod providers;
pub mod proximity;
pub mod session;
pub mod storage;
