//! Console frontend.
//!
//! Stands in for the out-of-scope visual layer: observes the controller's
//! state channel, prints each transition, surfaces one-shot failure
//! alerts, and forwards user input to `trigger`.

use std::error::Error;

use timeview_application::RequestController;
use timeview_domain::RequestState;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Runs the interactive loop: Enter retriggers, `q` quits.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub async fn run(controller: RequestController) -> Result<(), Box<dyn Error>> {
    println!("timeview - press Enter to fetch the current date & time, q to quit");

    let mut state_rx = controller.subscribe();
    let render_task = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            render(&state);
        }
    });

    let alert_task = controller.alerts().map(|mut alerts| {
        tokio::spawn(async move {
            while let Some(message) = alerts.recv().await {
                eprintln!("error: {message}");
            }
        })
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" | "quit" | "exit" => break,
            _ => {
                if !controller.trigger() {
                    println!("(a request is already in flight)");
                }
            }
        }
    }

    // Tear down: an in-flight resolution is discarded, not applied.
    controller.shutdown();
    render_task.abort();
    if let Some(task) = alert_task {
        task.abort();
    }
    Ok(())
}

/// Performs a single fetch and exits, failing the process on error.
///
/// # Errors
///
/// Returns the failure message if the request does not succeed.
pub async fn run_once(controller: &RequestController) -> Result<(), Box<dyn Error>> {
    let mut state_rx = controller.subscribe();
    controller.trigger();
    let state = state_rx
        .wait_for(RequestState::is_settled)
        .await?
        .clone();
    render(&state);
    match state {
        RequestState::Failure { message, .. } => Err(message.into()),
        _ => Ok(()),
    }
}

fn render(state: &RequestState) {
    match state {
        RequestState::Idle => println!("press Enter to fetch the current date & time"),
        RequestState::Loading { .. } => println!("fetching current date & time..."),
        RequestState::Success { timestamp } => println!("current date & time: {timestamp}"),
        RequestState::Failure {
            kind,
            message,
            last_known,
        } => {
            println!("{}: {message}", kind.title());
            if let Some(last) = last_known {
                println!("last known value: {last}");
            }
        }
    }
}
