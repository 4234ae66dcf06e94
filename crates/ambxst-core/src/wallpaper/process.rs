use std::process::Stdio;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Run an external tool to completion, killing it after `timeout`
pub(crate) async fn run_tool(program: &str, args: &[String], timeout: Duration) -> Result<()> {
    debug!("Running {} {:?}", program, args);

    let child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::Command {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| Error::Command {
            program: program.to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => {
            return Err(Error::Command {
                program: program.to_string(),
                reason: "Timeout".to_string(),
            })
        }
    };

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = match stderr.trim() {
        "" => "Unknown error".to_string(),
        msg => msg.to_string(),
    };
    Err(Error::Command {
        program: program.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_a_command_error() {
        let err = run_tool("ambxst-no-such-tool", &[], Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Command { .. }));
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let err = run_tool("sleep", &["5".to_string()], Duration::from_millis(50))
            .await
            .unwrap_err();
        match err {
            Error::Command { reason, .. } => assert_eq!(reason, "Timeout"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn failing_program_reports_stderr() {
        let args = ["-c".to_string(), "echo broken >&2; exit 3".to_string()];
        let err = run_tool("sh", &args, Duration::from_secs(5)).await.unwrap_err();
        match err {
            Error::Command { program, reason } => {
                assert_eq!(program, "sh");
                assert_eq!(reason, "broken");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
