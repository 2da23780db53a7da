use serde::{Deserialize, Serialize};

use crate::{
    domain::{Profile, ProfileId},
    error::FetchError,
};

/// Shape of one element of the random user API response array.
///
/// Every field is required; extra fields sent by the API are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUserRecord {
    pub id: i64,
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub password: String,
}

impl From<RemoteUserRecord> for Profile {
    fn from(value: RemoteUserRecord) -> Self {
        Self {
            id: ProfileId(value.id),
            uid: value.uid,
            first_name: value.first_name,
            last_name: value.last_name,
            username: value.username,
            email: value.email,
            avatar_url: value.avatar,
            password: value.password,
        }
    }
}

/// Decodes a full response body. A single malformed record fails the batch.
pub fn decode_batch(body: &[u8]) -> Result<Vec<Profile>, FetchError> {
    let records: Vec<RemoteUserRecord> = serde_json::from_slice(body)?;
    Ok(records.into_iter().map(Profile::from).collect())
}
