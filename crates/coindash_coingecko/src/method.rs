use serde::Serialize;

/// One upstream endpoint: its query parameters, decoded response and path.
///
/// Path segments such as the coin id live on `Params` and are skipped during
/// query serialization.
pub trait Method {
    type Response: serde::de::DeserializeOwned;
    type Params: Serialize;

    fn path(params: &Self::Params) -> String;
}
