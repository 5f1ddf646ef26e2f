use anyhow::{bail, Context, Result};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, warn};

/// Emits the platform paste chord into the focused window.
pub(crate) trait KeyInjector {
    fn send_paste(&mut self) -> Result<()>;
}

/// Runs a helper program (`xdotool`, `osascript`, PowerShell) and waits for
/// it to exit.
pub(crate) struct CommandInjector {
    program: String,
    args: Vec<String>,
    /// How long to keep the process alive after the keystroke so the target
    /// window can fetch the clipboard from us.
    settle: Duration,
}

impl CommandInjector {
    pub(crate) fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            settle: Duration::ZERO,
        }
    }

    pub(crate) fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    #[cfg(target_os = "macos")]
    pub(crate) fn for_current_platform() -> Self {
        Self::new(
            "osascript",
            &[
                "-e",
                r#"tell application "System Events" to keystroke "v" using {command down}"#,
            ],
        )
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn for_current_platform() -> Self {
        Self::new(
            "powershell",
            &[
                "-NoProfile",
                "-Command",
                "$wshell = New-Object -ComObject wscript.shell; $wshell.SendKeys('^v')",
            ],
        )
    }

    /// X11 clipboards are served by the owning process, hence the settle
    /// delay.
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub(crate) fn for_current_platform() -> Self {
        Self::new("xdotool", &["key", "--clearmodifiers", "ctrl+v"])
            .with_settle(Duration::from_millis(300))
    }

    #[cfg(test)]
    pub(crate) fn program(&self) -> &str {
        &self.program
    }
}

impl KeyInjector for CommandInjector {
    fn send_paste(&mut self) -> Result<()> {
        debug!(program = %self.program, "sending paste keystroke");
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;
        if !status.success() {
            bail!("{} exited with {status}", self.program);
        }
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        Ok(())
    }
}

/// Desktop notification after a filtered paste.
pub(crate) trait Notifier {
    fn notify(&mut self, title: &str, body: &str);
}

/// Best-effort notifications through the platform's command-line tool.
/// Failures are logged and otherwise ignored.
pub(crate) struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, body: &str) {
        let mut cmd = if cfg!(target_os = "macos") {
            let script = format!(
                "display notification {} with title {}",
                applescript_string(body),
                applescript_string(title)
            );
            let mut cmd = Command::new("osascript");
            cmd.args(["-e", &script]);
            cmd
        } else if cfg!(target_os = "windows") {
            debug!(title, body, "notifications are not supported on this platform");
            return;
        } else {
            let mut cmd = Command::new("notify-send");
            cmd.args(["--app-name=ClipFilter", title, body]);
            cmd
        };

        match cmd.status() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(%status, "notification command failed"),
            Err(e) => warn!(error = %e, "failed to run notification command"),
        }
    }
}

fn applescript_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
