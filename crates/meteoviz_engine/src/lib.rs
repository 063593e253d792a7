//! MeteoViz engine: image fetching, load timers, and export side effects.
mod decode;
mod engine;
mod export;
mod fetch;
mod filename;
mod opener;
mod persist;
mod timer;
mod types;

pub use decode::{inspect_image, DecodeError};
pub use engine::{EngineConfig, EngineHandle};
pub use export::{ExportError, ImageExporter};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::safe_filename;
pub use opener::{ExternalOpener, OpenError, SystemOpener};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use timer::LoadTimer;
pub use types::{
    EngineEvent, ExportOutcome, FailureKind, FetchError, FetchMetadata, FetchOutput, ImageInfo,
    LoadToken,
};
