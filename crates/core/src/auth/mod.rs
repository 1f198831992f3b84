//! Authentication state and token refresh coordination.

pub mod service;
pub mod session;

pub use service::{AuthManager, AuthState, TokenRefreshCallback};
pub use session::{RecoveryGuard, Session, SessionState};
