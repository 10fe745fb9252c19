use serde::de::DeserializeOwned;
use serde::Serialize;

/// The structured-value serialization collaborator.
///
/// The codecs never inspect serialized bytes — headers and bodies alike
/// go through this seam, which is what makes one codec work for every
/// message schema.
pub trait WireFormat {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize a value to its wire bytes.
    fn to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize a value from wire bytes.
    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error>;
}

/// JSON wire format via serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl WireFormat for JsonFormat {
    type Error = serde_json::Error;

    fn to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(value)
    }

    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(bytes)
    }
}
