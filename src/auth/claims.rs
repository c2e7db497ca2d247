use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID, decimal
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
    pub jti: Uuid, // unique per token
}

impl Claims {
    pub fn user_id(&self) -> anyhow::Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("subject is not a user id: {}", self.sub))
    }
}
