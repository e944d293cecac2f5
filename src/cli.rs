//! Command Line Interface (CLI) arguments.

use clap::Parser;
use url::Url;

/// Hydroscope command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "HYDROSCOPE_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8080, env = "HYDROSCOPE_PORT")]
    pub port: u16,
    /// Path to the water quality dataset CSV
    #[arg(
        long,
        default_value = "data/cleaned_waterquality.csv",
        env = "HYDROSCOPE_DATASET_PATH"
    )]
    pub dataset_path: String,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "HYDROSCOPE_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/hydroscope/certs/cert.pem",
        env = "HYDROSCOPE_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/hydroscope/certs/key.pem",
        env = "HYDROSCOPE_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for operations to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "HYDROSCOPE_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Endpoint of the generative-language narrative service
    #[arg(
        long,
        default_value = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent",
        env = "HYDROSCOPE_NARRATIVE_URL"
    )]
    pub narrative_url: Url,
    /// API key for the narrative service
    #[arg(long, default_value = "", env = "HYDROSCOPE_NARRATIVE_API_KEY")]
    pub narrative_api_key: String,
    /// Maximum time in seconds to wait for a narrative service response
    #[arg(long, default_value_t = 30, env = "HYDROSCOPE_NARRATIVE_TIMEOUT")]
    pub narrative_timeout: u64,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
