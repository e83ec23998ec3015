pub mod claims;
pub mod jwt;
pub mod password;
pub mod session_manager;
pub mod token_store;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use session_manager::{ListenerId, SessionManager};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use utils::{require_admin, require_self_or_admin, require_session};
