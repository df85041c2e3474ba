pub mod bearer;
pub mod grant;

pub use bearer::{Token, TokenResponse};
pub use grant::Grant;
