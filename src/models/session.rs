use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_record_id, OwnedRecord};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    #[serde(rename = "work")]
    Work,
    #[serde(rename = "shortBreak")]
    ShortBreak,
    #[serde(rename = "longBreak")]
    LongBreak,
}

/// One completed timer run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    #[serde(default = "new_record_id")]
    pub id: String,
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
    /// Calendar day the session belongs to, as sent by the client.
    pub date: String,
    /// Length in minutes.
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub preset: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl OwnedRecord for Session {
    const COLLECTION: &'static str = "pomodoro_sessions";
    const RESOURCE: &'static str = "Session";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn set_owner_id(&mut self, owner_id: String) {
        self.owner_id = owner_id;
    }
}
