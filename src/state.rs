use crate::config::{AppConfig, AuthMode, JwtConfig};
use crate::store::{JsonFileStore, ListStore, MemoryStore};
use axum::http::HeaderValue;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ListStore>,
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = Arc::new(JsonFileStore::open(&config.data_dir).await?) as Arc<dyn ListStore>;
        tracing::info!(data_dir = %config.data_dir.display(), auth_mode = ?config.auth_mode, "store opened");

        Ok(Self::from_parts(config, store, StdRng::from_entropy()))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn ListStore>, rng: StdRng) -> Self {
        Self {
            config,
            store,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Runs `f` with exclusive access to the shared random source.
    /// Never hold the result of this across an `.await`.
    pub fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    /// In-memory state with a fixed seed, for tests.
    pub fn fake() -> Self {
        Self::fake_with_mode(AuthMode::Legacy)
    }

    pub fn fake_with_mode(auth_mode: AuthMode) -> Self {
        let jwt = match auth_mode {
            AuthMode::Legacy => None,
            AuthMode::Secure => Some(JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            }),
        };
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: PathBuf::from("unused"),
            frontend_origin: HeaderValue::from_static("http://localhost:5173"),
            auth_mode,
            jwt,
        });

        let store = Arc::new(MemoryStore::new()) as Arc<dyn ListStore>;
        Self::from_parts(config, store, StdRng::seed_from_u64(7))
    }
}
