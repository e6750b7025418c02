//! External-command fallback for mute control.
//!
//! When the Core Audio binding fails, mute requests are routed through a
//! PowerShell child process that sends `APPCOMMAND_MICROPHONE_VOLUME_MUTE`
//! to the shell tray window. The AppCommand message has no absolute form:
//! the shell primitive toggles, and the controller's cache tracks the
//! requested state.

use crate::audio::controller::FallbackCommand;
use crate::audio::AudioError;
use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// CREATE_NO_WINDOW: keep the PowerShell console from flashing up.
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// PowerShell script sending the microphone-mute AppCommand to the shell.
const APPCOMMAND_SCRIPT: &str = r#"
Add-Type -TypeDefinition @'
using System;
using System.Runtime.InteropServices;
public class MicMuteShell {
    [DllImport("user32.dll")]
    public static extern IntPtr SendMessage(IntPtr hWnd, int Msg, IntPtr wParam, IntPtr lParam);
    [DllImport("user32.dll")]
    public static extern IntPtr FindWindow(string lpClassName, string lpWindowName);
}
'@
$WM_APPCOMMAND = 0x0319
$APPCOMMAND_MICROPHONE_VOLUME_MUTE = 0x180000
$hwnd = [MicMuteShell]::FindWindow('Shell_TrayWnd', $null)
if ($hwnd -eq [IntPtr]::Zero) { exit 1 }
[MicMuteShell]::SendMessage($hwnd, $WM_APPCOMMAND, $hwnd, [IntPtr]$APPCOMMAND_MICROPHONE_VOLUME_MUTE) | Out-Null
exit 0
"#;

/// Fallback that shells out to PowerShell.
pub struct AppCommandFallback {
    /// Longest we wait for the child before killing it.
    deadline: Duration,
}

impl AppCommandFallback {
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self {
            deadline: Self::DEFAULT_DEADLINE,
        }
    }

    #[cfg(test)]
    fn with_deadline(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Spawn the command and wait for it, bounded by the deadline.
    fn run(&self, mut command: Command) -> Result<(), AudioError> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()
            .map_err(|e| AudioError::FallbackFailed(e.to_string()))?;

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        return Ok(());
                    }
                    return Err(AudioError::FallbackFailed(format!(
                        "exit status {status}"
                    )));
                }
                Ok(None) => {
                    if started.elapsed() >= self.deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(AudioError::Timeout(self.deadline));
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(AudioError::FallbackFailed(e.to_string()));
                }
            }
        }
    }
}

impl Default for AppCommandFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCommand for AppCommandFallback {
    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        debug!(muted, "invoking AppCommand fallback");

        let mut command = Command::new("powershell");
        command.args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            APPCOMMAND_SCRIPT,
        ]);

        self.run(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These exercise the child-process plumbing with plain commands; the
    // PowerShell script itself needs a live shell tray to do anything.

    #[test]
    fn run_reports_success_by_exit_code() {
        let fallback = AppCommandFallback::new();

        let mut ok = Command::new("cmd");
        ok.args(["/C", "exit 0"]);
        assert!(fallback.run(ok).is_ok());

        let mut failing = Command::new("cmd");
        failing.args(["/C", "exit 3"]);
        assert!(matches!(
            fallback.run(failing),
            Err(AudioError::FallbackFailed(_))
        ));
    }

    #[test]
    fn run_kills_child_on_deadline() {
        let fallback = AppCommandFallback::with_deadline(Duration::from_millis(200));

        let mut hang = Command::new("cmd");
        hang.args(["/C", "ping -n 30 127.0.0.1 > NUL"]);
        assert!(matches!(fallback.run(hang), Err(AudioError::Timeout(_))));
    }

    #[test]
    fn spawn_failure_is_a_fallback_error() {
        let fallback = AppCommandFallback::new();
        let command = Command::new("micmute-no-such-binary");
        assert!(matches!(
            fallback.run(command),
            Err(AudioError::FallbackFailed(_))
        ));
    }
}
