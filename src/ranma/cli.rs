//! [`RenderTarget`] implementation backed by the `ranma` CLI.
//!
//! Every [`RenderCommand`] becomes one invocation:
//!
//! ```text
//! ranma add <name> [--type container] [--parent <p>] --<attr> <value> ...
//! ranma set <name> --<attr> <value> ...
//! ranma remove <name>
//! ```
//!
//! Attribute keys are passed as kebab-case flags; an empty value clears
//! the property.  Output of the client is discarded and a non-zero exit
//! status is only logged: the bar rejecting one command is not something
//! the bridge can act on.

use crate::render::{ElementKind, RenderCommand};
use crate::traits::RenderTarget;
use log::debug;
use std::process::{Command, Stdio};

/// Bar backend that shells out to the `ranma` client.
pub struct RanmaCli {
    program: String,
}

/// The client could not be started at all.
#[derive(Debug, thiserror::Error)]
#[error("failed to run {program}: {source}")]
pub struct RanmaError {
    program: String,
    #[source]
    source: std::io::Error,
}

impl RanmaCli {
    /// Create a handle that runs `program` for every command.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

fn flag(key: &str) -> String {
    format!("--{}", key.replace('_', "-"))
}

/// Subcommand name of `command`.
fn verb(command: &RenderCommand) -> &'static str {
    match command {
        RenderCommand::Add { .. } => "add",
        RenderCommand::Set { .. } => "set",
        RenderCommand::Remove { .. } => "remove",
    }
}

/// Command-line arguments (after the program name) for `command`.
pub fn command_args(command: &RenderCommand) -> Vec<String> {
    let mut args = vec![verb(command).to_string(), command.name().to_string()];
    match command {
        RenderCommand::Add {
            kind,
            parent,
            attrs,
            ..
        } => {
            if *kind == ElementKind::Container {
                args.push(flag("type"));
                args.push(kind.as_str().to_string());
            }
            if let Some(parent) = parent {
                args.push(flag("parent"));
                args.push(parent.clone());
            }
            for attr in attrs {
                args.push(flag(attr.key()));
                args.push(attr.value());
            }
        }
        RenderCommand::Set { attrs, .. } => {
            for attr in attrs {
                args.push(flag(attr.key()));
                args.push(attr.value());
            }
        }
        RenderCommand::Remove { .. } => {}
    }
    args
}

//  RenderTarget implementation

impl RenderTarget for RanmaCli {
    type Error = RanmaError;

    fn send(&self, command: &RenderCommand) -> Result<(), Self::Error> {
        let args = command_args(command);
        debug!("{} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| RanmaError {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            debug!("{} {} {}: {}", self.program, verb(command), command.name(), status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;
    use crate::render::{Attr, Paint};

    #[test]
    fn add_container_args() {
        let cmd = RenderCommand::add(
            "ws.d1",
            ElementKind::Container,
            None,
            vec![Attr::CornerRadius(8), Attr::Display("2".into())],
        )
        .unwrap();
        assert_eq!(
            command_args(&cmd),
            vec!["add", "ws.d1", "--type", "container", "--corner-radius", "8", "--display", "2"]
        );
    }

    #[test]
    fn add_item_args_carry_parent_but_no_type() {
        let cmd = RenderCommand::add(
            "space.d1.3",
            ElementKind::Item,
            Some("ws.d1".into()),
            vec![Attr::Label("3".into()), Attr::Position(3)],
        )
        .unwrap();
        assert_eq!(
            command_args(&cmd),
            vec!["add", "space.d1.3", "--parent", "ws.d1", "--label", "3", "--position", "3"]
        );
    }

    #[test]
    fn set_args_with_cleared_background() {
        let cmd = RenderCommand::set(
            "space.d2.1",
            ElementKind::Item,
            vec![
                Attr::LabelColor(Paint::Color(Color::grey(0x88).with_alpha(0x40))),
                Attr::BackgroundColor(Paint::Clear),
            ],
        )
        .unwrap();
        assert_eq!(
            command_args(&cmd),
            vec![
                "set",
                "space.d2.1",
                "--label-color",
                "#88888840",
                "--background-color",
                ""
            ]
        );
    }

    #[test]
    fn remove_args() {
        assert_eq!(
            command_args(&RenderCommand::remove("ws.d3")),
            vec!["remove", "ws.d3"]
        );
    }

    #[test]
    fn successful_client_is_ok() {
        let cli = RanmaCli::new("true");
        assert!(cli.send(&RenderCommand::remove("ws.d1")).is_ok());
    }

    #[test]
    fn rejected_command_is_not_an_error() {
        let cli = RanmaCli::new("false");
        assert!(cli.send(&RenderCommand::remove("ws.d1")).is_ok());
    }

    #[test]
    fn missing_client_reports_spawn_error() {
        let cli = RanmaCli::new("/nonexistent/tagbridge-ranma");
        let err = cli.send(&RenderCommand::remove("ws.d1")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tagbridge-ranma"));
    }
}
