//! System clipboard access through the display server's copy tool.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

const WL_COPY_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

impl DisplayServer {
    pub fn detect() -> Self {
        Self::detect_with(|name| env::var(name).ok())
    }

    /// Session type first, then the display sockets
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(session_type) = lookup("XDG_SESSION_TYPE") {
            match session_type.to_lowercase().as_str() {
                "wayland" => return DisplayServer::Wayland,
                "x11" => return DisplayServer::X11,
                _ => {}
            }
        }
        if lookup("WAYLAND_DISPLAY").is_some() {
            return DisplayServer::Wayland;
        }
        if lookup("DISPLAY").is_some() {
            return DisplayServer::X11;
        }
        DisplayServer::Unknown
    }

    /// Program and arguments that read clipboard content from stdin
    pub fn copy_command(self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            DisplayServer::Wayland => Some(("wl-copy", WL_COPY_ARGS)),
            DisplayServer::X11 => Some(("xclip", XCLIP_ARGS)),
            DisplayServer::Unknown => None,
        }
    }
}

pub fn copy_to_clipboard(text: &str, display_server: DisplayServer) -> Result<()> {
    let Some((program, args)) = display_server.copy_command() else {
        bail!("Unknown display server - cannot copy to clipboard");
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start {}", program))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {}", program))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}
