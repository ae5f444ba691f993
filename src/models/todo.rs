use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_record_id, OwnedRecord};

/// A task the user plans to work through in pomodoros.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Todo {
    #[serde(default = "new_record_id")]
    pub id: String,
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_pomodoros_estimated")]
    pub pomodoros_estimated: u32,
    #[serde(default)]
    pub pomodoros_completed: u32,
}

fn default_pomodoros_estimated() -> u32 {
    1
}

impl Todo {
    pub fn new(title: impl Into<String>) -> Self {
        Todo {
            id: new_record_id(),
            owner_id: String::new(),
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
            pomodoros_estimated: default_pomodoros_estimated(),
            pomodoros_completed: 0,
        }
    }
}

impl OwnedRecord for Todo {
    const COLLECTION: &'static str = "todos";
    const RESOURCE: &'static str = "Todo";

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
