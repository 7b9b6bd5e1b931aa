// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`Presenter`] that renders messages on the terminal.
//!
//! Each message is printed, then dismissed by its timeout or by a line of
//! input: a button number presses that button, an empty line dismisses the
//! message unless it is blocking.

use std::io::{BufRead, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use colored::Colorize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use herald_core::{
    AdapterType, Anchor, Completion, HealthStatus, HeraldError, InAppMessage, LinkType, Message,
    PluginAdapter, Presenter,
};

type Output = Arc<Mutex<Box<dyn Write + Send>>>;
type Input = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>>;

/// Presents messages on a terminal. The terminal is always a live anchor.
pub struct TerminalPresenter {
    output: Output,
    input: Input,
    color: bool,
}

impl TerminalPresenter {
    /// Reads lines from `input` and writes to `output`.
    pub fn new(
        output: impl Write + Send + 'static,
        input: mpsc::UnboundedReceiver<String>,
        color: bool,
    ) -> Self {
        Self {
            output: Arc::new(Mutex::new(Box::new(output))),
            input: Arc::new(tokio::sync::Mutex::new(input)),
            color,
        }
    }

    /// Wired to the process's stdin and stdout.
    ///
    /// Stdin is read on a dedicated thread so a pending read never holds a
    /// runtime worker.
    pub fn stdio(plain: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let reader = std::thread::Builder::new()
            .name("herald-stdin".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = reader {
            warn!(error = %e, "failed to start stdin reader, messages will dismiss immediately");
        }

        let color = !plain && std::io::stdout().is_terminal();
        Self::new(std::io::stdout(), rx, color)
    }
}

#[async_trait]
impl PluginAdapter for TerminalPresenter {
    fn name(&self) -> &str {
        "terminal"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Presenter
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

impl Presenter for TerminalPresenter {
    fn topmost_anchor(&self) -> Option<Anchor> {
        Some(Anchor("terminal".into()))
    }

    fn present(&self, message: Message, _anchor: Anchor, completion: Completion) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(message_id = %message.id, "no async runtime, skipping presentation");
            return;
        };
        let output = Arc::clone(&self.output);
        let input = Arc::clone(&self.input);
        let color = self.color;
        runtime.spawn(interact(message, output, input, color, completion));
    }
}

async fn interact(
    message: Message,
    output: Output,
    input: Input,
    color: bool,
    completion: Completion,
) {
    let Some(in_app) = message.in_app.as_ref() else {
        completion.advance();
        return;
    };
    write(&output, &render(&message, in_app, color));

    let deadline = in_app.auto_dismiss_after().map(|after| Instant::now() + after);
    let mut input = input.lock().await;
    loop {
        let line = match deadline {
            Some(deadline) => tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    debug!(message_id = %message.id, "message timed out");
                    completion.advance();
                    return;
                }
                line = input.recv() => line,
            },
            None => input.recv().await,
        };

        let Some(line) = line else {
            if in_app.is_blocking {
                warn!(message_id = %message.id, "input closed while a blocking message was shown");
            }
            completion.advance();
            return;
        };

        match interpret(&line, in_app) {
            Reply::Dismiss => {
                completion.advance();
                return;
            }
            Reply::Button(index) => {
                if let Some(button) = in_app.buttons.get(index) {
                    let action = describe_action(button.link_type, button.link.as_deref());
                    write(&output, &format!("  -> {action}\n"));
                }
                completion.button_pressed(index);
                return;
            }
            Reply::Invalid => write(&output, &format!("  {}\n", hint(in_app))),
        }
    }
}

fn write(output: &Output, text: &str) {
    let mut out = output.lock().unwrap_or_else(|e| e.into_inner());
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        debug!(error = %e, "terminal write failed");
    }
}

/// What a line of input means for the message on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Dismiss,
    Button(usize),
    Invalid,
}

fn interpret(line: &str, in_app: &InAppMessage) -> Reply {
    let line = line.trim();
    if line.is_empty() {
        return if in_app.allows_gesture_dismissal() {
            Reply::Dismiss
        } else {
            Reply::Invalid
        };
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=in_app.buttons.len()).contains(&n) => Reply::Button(n - 1),
        _ => Reply::Invalid,
    }
}

fn render(message: &Message, in_app: &InAppMessage, color: bool) -> String {
    let mut text = String::new();
    let header = format!("-- {} #{} --", in_app.style, message.id);
    text.push_str(&format!("\n  {}\n", paint(&header, color, |s| s.dimmed())));

    let title = in_app.title.as_deref().unwrap_or(&message.title);
    if !title.is_empty() {
        text.push_str(&format!("  {}\n", paint(title, color, |s| s.bold())));
    }
    if !in_app.body.is_empty() {
        text.push_str(&format!("  {}\n", in_app.body));
    }
    if let Some(image) = &in_app.image {
        text.push_str(&format!("  [image] {image}\n"));
    }
    for (i, button) in in_app.buttons.iter().enumerate() {
        let label = format!("[{}] {}", i + 1, button.title);
        text.push_str(&format!("  {}\n", paint(&label, color, |s| s.cyan())));
    }
    text.push_str(&format!("  {}\n", hint(in_app)));
    text
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> colored::ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn hint(in_app: &InAppMessage) -> String {
    let mut parts = Vec::new();
    if !in_app.buttons.is_empty() {
        parts.push(format!("1-{} to press a button", in_app.buttons.len()));
    }
    if in_app.allows_gesture_dismissal() {
        parts.push("enter to dismiss".to_string());
    }
    if let Some(after) = in_app.auto_dismiss_after() {
        parts.push(format!("closes in {}s", after.as_secs()));
    }
    if parts.is_empty() {
        "waiting for input".to_string()
    } else {
        format!("({})", parts.join(", "))
    }
}

fn describe_action(link_type: LinkType, link: Option<&str>) -> String {
    match (link_type, link) {
        (LinkType::Link, Some(link)) => format!("open {link}"),
        (LinkType::InApp, Some(link)) => format!("open in app {link}"),
        (LinkType::Section, Some(link)) => format!("go to section {link}"),
        _ => "no action".to_string(),
    }
}
