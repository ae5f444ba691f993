use tracing::info;

use super::{decode, encode};
use crate::models::settings::SETTINGS_COLLECTION;
use crate::models::{Identity, Settings};
use crate::store::{DocumentStore, StoreError};

/// The single settings document of one identity, keyed by its id.
pub struct SettingsAccess<'a> {
    store: &'a dyn DocumentStore,
    identity: &'a Identity,
}

impl<'a> SettingsAccess<'a> {
    pub fn new(store: &'a dyn DocumentStore, identity: &'a Identity) -> Self {
        SettingsAccess { store, identity }
    }

    /// Reads the caller's settings, writing and returning the defaults on first use.
    ///
    /// Two concurrent first reads may both write the defaults; they write the
    /// same document, so the last write wins harmlessly.
    pub async fn get_or_create_default(&self) -> Result<Settings, StoreError> {
        if let Some(document) = self
            .store
            .get(SETTINGS_COLLECTION, &self.identity.id)
            .await?
        {
            return decode(SETTINGS_COLLECTION, document);
        }

        let defaults = Settings::default_for(self.identity.id.clone());
        self.store
            .set(
                SETTINGS_COLLECTION,
                &self.identity.id,
                encode(SETTINGS_COLLECTION, &defaults)?,
            )
            .await?;
        info!("Created default settings for uid '{}'", self.identity.id);
        Ok(defaults)
    }

    /// Overwrites the caller's settings; the owner is always the caller.
    pub async fn save(&self, mut settings: Settings) -> Result<Settings, StoreError> {
        settings.owner_id = self.identity.id.clone();
        self.store
            .set(
                SETTINGS_COLLECTION,
                &self.identity.id,
                encode(SETTINGS_COLLECTION, &settings)?,
            )
            .await?;
        Ok(settings)
    }
}
