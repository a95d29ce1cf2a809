use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::converter::ConverterConfig;
use crate::export::ExportConfig;
use crate::orchestrator::OrchestratorConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub converter: SanitizedConverterConfig,
    pub orchestrator: OrchestratorConfig,
    pub export: ExportConfig,
}

/// Converter config without the raw ffmpeg argument list
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConverterConfig {
    pub ffmpeg_path: PathBuf,
    pub temp_dir: PathBuf,
    pub timeout_secs: u64,
    pub ffmpeg_log_level: String,
    pub extra_ffmpeg_args_count: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            converter: SanitizedConverterConfig {
                ffmpeg_path: config.converter.ffmpeg_path.clone(),
                temp_dir: config.converter.temp_dir.clone(),
                timeout_secs: config.converter.timeout_secs,
                ffmpeg_log_level: config.converter.ffmpeg_log_level.clone(),
                extra_ffmpeg_args_count: config.converter.extra_ffmpeg_args.len(),
            },
            orchestrator: config.orchestrator.clone(),
            export: config.export.clone(),
        }
    }
}
