//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and HTTP.
//! Services are generic over repository/nonce traits, but AppState pins them
//! to the concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use benefactor_core::form::filter::FilterPipeline;
use benefactor_core::form::overrides::ConfigOverrideFilter;
use benefactor_core::form::profile::ProfileForm;
use benefactor_core::render::SectionHooks;
use benefactor_core::service::donor::DonorService;
use benefactor_core::service::profile::ProfileService;
use benefactor_infra::config::load_global_config;
use benefactor_infra::crypto::nonce::HmacNonceIssuer;
use benefactor_infra::filesystem::{database_url, nonce_key_path, resolve_data_dir};
use benefactor_infra::sqlite::donor::SqliteDonorRepository;
use benefactor_infra::sqlite::pool::DatabasePool;
use benefactor_infra::sqlite::session::SqliteSessionRepository;
use benefactor_types::config::GlobalConfig;

pub type ConcreteProfileService = ProfileService<SqliteDonorRepository, HmacNonceIssuer>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<ConcreteProfileService>,
    pub sessions: Arc<SqliteSessionRepository>,
    pub hooks: SectionHooks,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state in the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_in(&resolve_data_dir()).await
    }

    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init_in(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let config = load_global_config(data_dir).await;
        let db_pool = DatabasePool::new(&database_url(data_dir)).await?;

        let nonces =
            HmacNonceIssuer::load_or_create(&nonce_key_path(data_dir), config.nonce_lifetime_secs)
                .await?;

        let pipeline = FilterPipeline::new().with(Arc::new(ConfigOverrideFilter::new(
            config.field_overrides.clone(),
        )));
        tracing::debug!(?pipeline, "profile filter pipeline");

        let profile_service = ProfileService::new(
            DonorService::new(SqliteDonorRepository::new(db_pool.clone())),
            nonces,
            ProfileForm::new(pipeline),
        );

        Ok(Self {
            profile_service: Arc::new(profile_service),
            sessions: Arc::new(SqliteSessionRepository::new(db_pool.clone())),
            hooks: SectionHooks::with_defaults(),
            config: Arc::new(config),
            data_dir: data_dir.to_path_buf(),
            db_pool,
        })
    }
}
