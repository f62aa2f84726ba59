//! Shared response envelope types for API handlers.
//!
//! Successful responses use a `{ "status": "success", "data": ... }`
//! envelope. Use [`DataResponse`] instead of ad-hoc
//! `serde_json::json!({ "data": ... })` to keep the shape consistent.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Standard `{ "status": "success", "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Serialize for DataResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("DataResponse", 2)?;
        envelope.serialize_field("status", "success")?;
        envelope.serialize_field("data", &self.data)?;
        envelope.end()
    }
}
