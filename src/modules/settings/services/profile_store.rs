use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::Result;
use crate::modules::settings::models::CompanyProfile;
use crate::modules::settings::repositories::SettingsRepository;

/// Holds the current company profile for every consumer.
///
/// Readers get an `Arc` snapshot that stays fixed for as long as they hold it;
/// the stored profile only changes through `update` and `reload`.
pub struct CompanyProfileStore {
    repository: SettingsRepository,
    current: RwLock<Arc<CompanyProfile>>,
}

impl CompanyProfileStore {
    /// Read the persisted profile, falling back to an empty one
    pub async fn load(repository: SettingsRepository) -> Result<Self> {
        let profile = repository.find_profile().await?.unwrap_or_default();
        if profile.company_name.is_empty() {
            tracing::warn!("No company profile configured; invoices will carry an empty seller");
        }

        Ok(Self {
            repository,
            current: RwLock::new(Arc::new(profile)),
        })
    }

    pub async fn snapshot(&self) -> Arc<CompanyProfile> {
        self.current.read().await.clone()
    }

    /// Persist first, then publish the new profile
    pub async fn update(&self, profile: &CompanyProfile) -> Result<Arc<CompanyProfile>> {
        let profile = Arc::new(profile.normalized()?);

        let mut current = self.current.write().await;
        self.repository.save_profile(&profile).await?;
        *current = profile.clone();

        tracing::info!(company = %profile.company_name, "Company profile updated");
        Ok(profile)
    }

    /// Pick up changes written to the database outside this process
    pub async fn reload(&self) -> Result<Arc<CompanyProfile>> {
        let profile = Arc::new(self.repository.find_profile().await?.unwrap_or_default());

        let mut current = self.current.write().await;
        *current = profile.clone();

        tracing::info!(company = %profile.company_name, "Company profile reloaded");
        Ok(profile)
    }
}
