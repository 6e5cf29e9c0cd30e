// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod form;
pub mod ledger;
pub mod logging;
pub mod round;
pub mod runtime;
pub mod scoreboard;
pub mod session;
pub mod ui;
pub mod undo;

pub use app::{App, Control, Mode};
pub use error::{ErrorKind, SessionError};
pub use session::{Session, SessionConfig};
