use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub storage: StorageConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "TALKBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TALKBOARD_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Upper bound on how long shutdown waits for telemetry to flush
    #[arg(long, env = "TALKBOARD_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    #[default]
    #[value(name = "dynamodb")]
    DynamoDb,
    Memory,
}

#[derive(Clone, Debug, Args)]
pub struct StorageConfig {
    /// Which message store to run against
    #[arg(long = "storage-backend", env = "TALKBOARD_STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::DynamoDb)]
    pub backend: StorageBackend,

    /// DynamoDB table holding messages (partition key `room_id`, sort key `msg_id`)
    #[arg(long, env = "DDB_TABLE", default_value = "talk_messages")]
    pub table: String,

    /// AWS region of the table
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom DynamoDB endpoint (useful for DynamoDB Local)
    #[arg(long = "dynamodb-endpoint", env = "TALKBOARD_DYNAMODB_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Static access key, overrides the default credential chain
    #[arg(long = "dynamodb-access-key", env = "TALKBOARD_DYNAMODB_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// Static secret key, overrides the default credential chain
    #[arg(long = "dynamodb-secret-key", env = "TALKBOARD_DYNAMODB_SECRET_KEY")]
    pub secret_key: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "TALKBOARD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are exported only when set
    #[arg(long, env = "TALKBOARD_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
