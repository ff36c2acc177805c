//! Process Runner
//!
//! Invokes an external executable, captures combined stdout/stderr as
//! text, and reports a non-zero exit as an error. Both tools interleave
//! progress and results across the two streams, so they are always read
//! together.

use std::path::Path;
use std::process::Command;

use crate::error::CompareError;

/// Render a command line for logs and error messages.
pub fn render_command(program: &Path, args: &[String]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Run `program` with `args`, returning stdout followed by stderr.
pub fn run_tool(program: &Path, args: &[String]) -> Result<String, CompareError> {
    let command = render_command(program, args);
    tracing::debug!("running '{}'", command);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| CompareError::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(CompareError::ToolInvocationFailed {
            command,
            status: output.status.code().unwrap_or(-1),
        });
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}

/// Check that a path exists and is executable by the current user.
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_command() {
        let rendered = render_command(
            Path::new("/usr/bin/openssl"),
            &["speed".to_string(), "-mr".to_string()],
        );
        assert_eq!(rendered, "/usr/bin/openssl speed -mr");
    }

    #[test]
    fn test_spawn_failure_carries_command() {
        let missing = PathBuf::from("/nonexistent/speedcmp-no-such-tool");
        let err = run_tool(&missing, &["version".to_string()]).unwrap_err();
        match err {
            CompareError::SpawnFailed { command, .. } => {
                assert!(command.contains("no-such-tool"));
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_is_executable_rejects_missing_path() {
        assert!(!is_executable(Path::new("/nonexistent/speedcmp-no-such-tool")));
    }

    #[cfg(unix)]
    #[test]
    fn test_combined_output_and_exit_status() {
        // /bin/sh is a safe universal fixture on unix
        let sh = Path::new("/bin/sh");
        let out = run_tool(
            sh,
            &[
                "-c".to_string(),
                "echo out; echo err 1>&2".to_string(),
            ],
        )
        .unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));

        let err = run_tool(sh, &["-c".to_string(), "exit 3".to_string()]).unwrap_err();
        match err {
            CompareError::ToolInvocationFailed { status, .. } => assert_eq!(status, 3),
            other => panic!("expected ToolInvocationFailed, got {other:?}"),
        }
    }
}
