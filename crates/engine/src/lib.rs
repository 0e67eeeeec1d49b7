//! # Engine Crate
//!
//! Batch candidate-processing engine: scores candidates one at a time or
//! as a batch, tracks what is in flight and how far a batch has come, and
//! tells listeners about every change.
//!
//! ## Main Components
//!
//! - **state**: `ProcessingState`, the in-flight set and the current `BatchRun`
//! - **processor**: `CandidateProcessor`, one scoring call under scoped guards
//! - **batch**: `BatchProcessor`, sequential or pooled runs with cancellation
//! - **orchestrator**: `ScreeningOrchestrator`, the facade callers use
//! - **scorer** / **notify** / **events**: collaborators and listener channels
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{EngineConfig, RemoteScorer, ScreeningOrchestrator, TracingNotifier};
//!
//! let scorer = RemoteScorer::connect(scoring_config, store.clone()).await?;
//! let orchestrator = ScreeningOrchestrator::new(
//!     store,
//!     Arc::new(scorer),
//!     Arc::new(TracingNotifier),
//!     EngineConfig::default(),
//! );
//!
//! let outcome = orchestrator.process_all("job-1").await?;
//! ```

pub mod batch;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod notify;
pub mod orchestrator;
pub mod processor;
pub mod scorer;
pub mod state;

pub use batch::{BatchOutcome, BatchProcessor};
pub use config::EngineConfig;
pub use context::{EngineContext, RosterRefresh};
pub use error::{EngineError, Result, ScoringFailure};
pub use events::{EngineEvent, EventBus};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, NotificationSink, TracingNotifier};
pub use orchestrator::ScreeningOrchestrator;
pub use processor::{CandidateProcessor, ProcessOutcome, Rejection};
pub use scorer::{RemoteScorer, Scorer};
pub use state::{BatchRun, BatchSummary, ProcessingSnapshot, ProcessingState};
