pub mod classifier;
pub mod config;
pub mod controller;
pub mod converter;
pub mod export;
pub mod orchestrator;
pub mod session;
pub mod testing;

pub use classifier::{allowed_formats, classify, default_format, MediaCategory, TargetFormat};
pub use config::{
    load_config, load_config_from_str, resolve_config_path, validate_config, Config, ConfigError,
    SanitizedConfig,
};
pub use controller::{create_session_controller, ControllerError, SessionController, SessionHandle};
pub use converter::{Converter, ConverterConfig, ConverterError, FfmpegConverter};
pub use export::{
    DestinationPicker, ExportConfig, ExportError, ExportManager, ExportOutcome, FileCopier,
    FsCopier,
};
pub use orchestrator::{BatchOrchestrator, OrchestratorConfig, OrchestratorError};
pub use session::{
    Batch, FileStatus, InputOrigin, Session, SessionError, SessionSnapshot, SessionState,
    TrackedFile,
};
