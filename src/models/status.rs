use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_record_id;

/// An unauthenticated liveness ping recorded by a client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusCheck {
    #[serde(default = "new_record_id")]
    pub id: String,
    pub client_name: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

pub const STATUS_COLLECTION: &str = "status_checks";

#[derive(Deserialize, Debug)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl From<StatusCheckCreate> for StatusCheck {
    fn from(input: StatusCheckCreate) -> Self {
        StatusCheck {
            id: new_record_id(),
            client_name: input.client_name,
            timestamp: Utc::now(),
        }
    }
}
