//! Marble diagram operator engine
//!
//! Synchronizes independently timed marble timelines into logical instants
//! and drives operators once per instant. Operators are timelines themselves,
//! so they chain.
//!
//! ```text
//! letters: ^----(a)---(b)---(c)---X
//! numbers: ^----(1)---(2)---(3)---X
//! map:     ^----(a1)--(b2)--(c3)--X
//! ```

pub mod bounds;
pub mod cancellable;
pub mod config;
pub mod errors;
pub mod event;
pub mod input;
pub mod operator;
pub mod operators;
pub mod renderer;
pub mod runtime;
pub mod scheduler;
pub mod source;
pub mod testing;
pub mod timeline;

// Re-export commonly used types
pub use bounds::{BoundsStrategy, FirstInputBounds, IntersectionBounds, WidestBounds};
pub use cancellable::{Cancellable, FnCancellable, NestedCancellable};
pub use config::{OperatorConfig, OperatorOptions};
pub use errors::{MarbleError, MarbleResult};
pub use event::{MarbleEvent, MarbleEventKind, Time, ValueEvent};
pub use input::MarbleInput;
pub use operator::{Combinator, MarbleOperator, SyncOperator};
pub use renderer::{RenderSink, Renderer, TracingSink};
pub use runtime::{BasicRuntime, MarbleRuntime};
pub use scheduler::{LocalTaskScheduler, QueueScheduler, Scheduler, Task};
pub use source::{Callback, MarbleSource, SourceCallback, SourceMetadata, Subscribable};
pub use timeline::{Bounds, MarbleTimeline, MarbleTimelineInput};
