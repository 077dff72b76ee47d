pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod highlighter;
pub mod logging;

pub use config::Config;
pub use engine::{
    EngineConfig, EngineError, EngineResult, PromptEngine, QualityResponse, SqlResponse,
    TransformResponse,
};
pub use highlighter::SqlHighlighter;
