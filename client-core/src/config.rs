use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub upload: UploadSettings,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the back-office REST API, without the `/api` prefix.
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_max_age_secs")]
    pub max_age_secs: u64,
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
}

fn default_cache_max_age_secs() -> u64 {
    300
}

fn default_cache_max_size() -> usize {
    100
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_age_secs: default_cache_max_age_secs(),
            max_size: default_cache_max_size(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct UploadSettings {
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_max_file_size_bytes() -> u64 {
    15 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    [
        "application/pdf",
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/webp",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

impl Settings {
    /// Settings pointed at an arbitrary backend, defaults everywhere
    /// else. Used by tests and ad hoc tooling.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            backend: BackendSettings {
                base_url: base_url.into(),
                request_timeout_secs: default_request_timeout_secs(),
            },
            cache: CacheSettings::default(),
            retry: RetrySettings::default(),
            upload: UploadSettings::default(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("config");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
