//! `photobooth generate <first> <second>` – run the full workflow.

use anyhow::{Context, Result};
use photobooth_core::config::BoothConfig;
use photobooth_core::transport::CurlTransport;
use photobooth_core::{Payload, RunOutcome, WorkflowController, WorkflowOptions, WorkflowState};
use std::path::Path;
use std::sync::Arc;

pub async fn run_generate(cfg: &BoothConfig, first: &Path, second: &Path, json: bool) -> Result<()> {
    let first = Payload::from_path(first).await?;
    let second = Payload::from_path(second).await?;

    let transport = Arc::new(CurlTransport::new(cfg.curl_options()));
    let controller = WorkflowController::new(transport, WorkflowOptions::from_config(cfg));
    let mut states = controller.subscribe();

    let run = controller.run(Some(first), Some(second));
    tokio::pin!(run);

    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            changed = states.changed() => {
                if changed.is_ok() {
                    let state = states.borrow_and_update().clone();
                    if state.is_busy() {
                        if let Some(line) = render(&state) {
                            eprintln!("{line}");
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                controller.reset();
                anyhow::bail!("cancelled");
            }
        }
    };

    let state = match outcome {
        RunOutcome::Finished(state) => state,
        RunOutcome::Superseded => controller.state(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state).context("serialize state")?
        );
    }

    match &state {
        WorkflowState::Success { result_locator } => {
            if !json {
                println!("{result_locator}");
            }
            tracing::info!(result = %result_locator, "generate command finished");
            Ok(())
        }
        WorkflowState::Failed { message } => anyhow::bail!("{message}"),
        WorkflowState::Idle | WorkflowState::Busy => anyhow::bail!("run did not finish"),
    }
}

/// One status line for a state, or nothing for `Idle`.
pub(crate) fn render(state: &WorkflowState) -> Option<String> {
    match state {
        WorkflowState::Idle => None,
        WorkflowState::Busy => Some("Uploading both images and generating your photo...".to_string()),
        WorkflowState::Success { result_locator } => {
            Some(format!("Here is your photo: {result_locator}"))
        }
        WorkflowState::Failed { message } => Some(message.clone()),
    }
}
