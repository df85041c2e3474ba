pub mod body;
pub mod error;
pub mod path;
pub mod rapid_client;
pub mod response;

pub use body::{Json, JsonBody};
pub use error::{RapidError, TokenError};
pub use path::join_path;
pub use rapid_client::RapidClient;
pub use response::Response;
