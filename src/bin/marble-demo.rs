// Copyright (c) 2025 - Cowboy AI, Inc.
//! Marble Demo
//!
//! Zips two scripted timelines with `map`, delays the result, and renders
//! every input and output event as a log line.
//!
//! ```text
//! letters: ^----(a)----(b)----(c)----X
//! numbers: ^----(1)----(2)----(3)----X
//! map:     ^----(a1)---(b2)---(c3)---X
//! delay:   ^---------(a1)---(b2)---(c3)X
//! ```
//!
//! Run with: RUST_LOG=debug cargo run --bin marble-demo
//!
//! Environment:
//! - MARBLE_FRAME_TIME: logical time between frames (default: 10)
//! - MARBLE_BOUNDS_END: end of the input window (default: 100)

use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use marble_engine::{
    operators::{delay, map},
    testing::EmittableTimeline,
    BasicRuntime, Bounds, LocalTaskScheduler, MarbleEvent, MarbleInput, OperatorOptions,
    Renderer, Scheduler, SourceMetadata, Time, TracingSink,
};
use tracing::info;

/// Wall clock pause between frames so deferred flushes run
const FRAME_PAUSE: Duration = Duration::from_millis(20);

/// Configuration for the demo
#[derive(Debug, Clone)]
struct DemoConfig {
    /// Logical time between two frames
    frame_time: Time,
    /// End of the input window
    bounds_end: Time,
}

impl DemoConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let frame_time: Time = match std::env::var("MARBLE_FRAME_TIME") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("MARBLE_FRAME_TIME is not a number: {value}"))?,
            Err(_) => 10,
        };

        let bounds_end: Time = match std::env::var("MARBLE_BOUNDS_END") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("MARBLE_BOUNDS_END is not a number: {value}"))?,
            Err(_) => 100,
        };

        if frame_time <= 0 {
            bail!("MARBLE_FRAME_TIME must be positive, got {frame_time}");
        }

        Ok(Self {
            frame_time,
            bounds_end,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = DemoConfig::from_env()?;
    info!(
        frame_time = config.frame_time,
        bounds_end = config.bounds_end,
        "Starting marble demo"
    );

    // Operators hold Rc handles and must stay on this thread.
    let local = tokio::task::LocalSet::new();
    local.run_until(run(config)).await
}

async fn run(config: DemoConfig) -> Result<()> {
    let bounds = Bounds::new(0, config.bounds_end);
    let letters = EmittableTimeline::with_metadata(
        SourceMetadata::named("letters")
            .with_kind("string")
            .with_description("Scripted letters a to c"),
        bounds,
    );
    let numbers = EmittableTimeline::with_metadata(
        SourceMetadata::named("numbers")
            .with_kind("string")
            .with_description("Scripted digits 1 to 3"),
        bounds,
    );
    let scheduler: Rc<dyn Scheduler> = Rc::new(LocalTaskScheduler::new());

    let inputs = vec![
        MarbleInput::timeline(letters.clone()),
        MarbleInput::timeline(numbers.clone()),
    ];
    for input in &inputs {
        info!(
            input = input.name(),
            kind = input.kind(),
            description = input.description(),
            "Demo input"
        );
    }

    let zipped = map(
        |values: &[Option<String>]| values.iter().flatten().cloned().collect::<String>(),
        OperatorOptions::new(inputs, Rc::clone(&scheduler)),
    );
    let delayed = delay(
        config.frame_time / 2,
        OperatorOptions::new(vec![zipped.as_input()], scheduler),
    );

    let renderer = Renderer::new(TracingSink);
    let _zipped_handle = renderer
        .render(&BasicRuntime::new(zipped))
        .context("Failed to render map")?;
    let _delayed_handle = renderer
        .render(&BasicRuntime::new(delayed))
        .context("Failed to render delay")?;

    letters.emit(MarbleEvent::start(0));
    numbers.emit(MarbleEvent::start(0));
    tokio::time::sleep(FRAME_PAUSE).await;

    let mut time = 0;
    for (letter, number) in ["a", "b", "c"].into_iter().zip(["1", "2", "3"]) {
        time += config.frame_time;
        letters.emit(MarbleEvent::value(time, letter.to_string()));
        numbers.emit(MarbleEvent::value(time, number.to_string()));
        tokio::time::sleep(FRAME_PAUSE).await;
    }

    let end = (time + config.frame_time).min(config.bounds_end);
    letters.emit(MarbleEvent::closed(end));
    numbers.emit(MarbleEvent::closed(end));
    tokio::time::sleep(FRAME_PAUSE).await;

    renderer.dispose();
    info!("Marble demo finished");
    Ok(())
}
