use serde::Serialize;
use serde_json::Value;

/// A request payload that knows how to render itself as JSON.
///
/// Implement it directly for types that need a custom wire format. Any
/// `Serialize` type can be sent through the default codec by wrapping it in
/// [`Json`].
pub trait JsonBody {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error>;
}

/// Default codec: plain `serde_json` serialization of the wrapped value.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> JsonBody for Json<T> {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}

impl JsonBody for Value {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl<B: JsonBody + ?Sized> JsonBody for &B {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        (**self).to_json()
    }
}
