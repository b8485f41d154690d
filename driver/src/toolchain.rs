// External C toolchain: compiles generated C with the system compiler and
// runs the resulting executable, both under a wall-clock timeout.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use model::Platform;
use tempfile::TempDir;
use tracing::{debug, trace, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const SOURCE_FILE: &str = "program.c";
const PROGRAM_STEM: &str = "program";

#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("C compiler failed{}:\n{stderr}", exit_suffix(.status))]
    CompileFailed { status: Option<i32>, stderr: String },
    #[error("timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by a signal)".to_string(),
    }
}

/// A compiled executable. The temporary directory holding it is removed when
/// the unit is dropped.
#[derive(Debug)]
pub struct CompiledUnit {
    _dir: TempDir,
    executable: PathBuf,
}

impl CompiledUnit {
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Copy the executable out of the temporary directory.
    pub fn persist(&self, dest: &Path) -> io::Result<()> {
        std::fs::copy(&self.executable, dest)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Compile-and-run collaborator for generated C.
pub trait Toolchain {
    fn compile(&self, source: &str) -> Result<CompiledUnit, ToolchainError>;
    fn run(&self, unit: &CompiledUnit) -> Result<RunOutput, ToolchainError>;
}

/// Invokes a `cc`-compatible compiler.
#[derive(Debug, Clone)]
pub struct CcToolchain {
    compiler: String,
    timeout: Duration,
}

impl CcToolchain {
    pub fn new(compiler: impl Into<String>, timeout: Duration) -> Self {
        Self { compiler: compiler.into(), timeout }
    }

    /// Whether the configured compiler can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.compiler)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }
}

impl Toolchain for CcToolchain {
    #[tracing::instrument(level = "trace", skip_all, fields(compiler = %self.compiler))]
    fn compile(&self, source: &str) -> Result<CompiledUnit, ToolchainError> {
        let dir = tempfile::tempdir()?;
        let source_path = dir.path().join(SOURCE_FILE);
        std::fs::write(&source_path, source)?;
        let executable = dir.path().join(Platform::host().executable_name(PROGRAM_STEM));

        let mut cmd = Command::new(&self.compiler);
        cmd.arg("-std=c99").arg("-O2").arg("-o").arg(&executable).arg(&source_path);
        let finished = run_with_timeout(cmd, self.timeout, true)?;

        if !finished.status.success() {
            return Err(ToolchainError::CompileFailed {
                status: finished.status.code(),
                stderr: String::from_utf8_lossy(&finished.stderr).into_owned(),
            });
        }
        debug!(executable = %executable.display(), "Compiled generated C");
        Ok(CompiledUnit { _dir: dir, executable })
    }

    /// Runs the executable with its stderr inherited, so runtime errors reach
    /// the user directly.
    #[tracing::instrument(level = "trace", skip_all)]
    fn run(&self, unit: &CompiledUnit) -> Result<RunOutput, ToolchainError> {
        let finished = run_with_timeout(Command::new(unit.executable()), self.timeout, false)?;
        let output = RunOutput {
            status: finished.status.code(),
            stdout: String::from_utf8_lossy(&finished.stdout).into_owned(),
        };
        trace!(status = ?output.status, bytes = output.stdout.len(), "Program exited");
        Ok(output)
    }
}

struct Finished {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Spawn `cmd`, drain its pipes on helper threads and poll it until it exits
/// or `timeout` elapses, in which case it is killed.
fn run_with_timeout(mut cmd: Command, timeout: Duration, capture_stderr: bool) -> Result<Finished, ToolchainError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(if capture_stderr { Stdio::piped() } else { Stdio::inherit() });

    let mut child = cmd
        .spawn()
        .map_err(|source| ToolchainError::Spawn { program: program.clone(), source })?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            warn!(%program, "Killing process after timeout");
            // The child may exit between try_wait and kill.
            let _ = child.kill();
            child.wait()?;
            return Err(ToolchainError::TimedOut(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Finished {
        status,
        stdout: collect(stdout)?,
        stderr: collect(stderr)?,
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<io::Result<Vec<u8>>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn collect(handle: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("output reader thread panicked"))?,
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_failure_message_includes_stderr() {
        let err = ToolchainError::CompileFailed { status: Some(1), stderr: "bad.c: error".into() };
        assert_eq!(err.to_string(), "C compiler failed with exit code 1:\nbad.c: error");
    }

    #[test]
    fn only_exit_code_zero_is_success() {
        let run = |status| RunOutput { status, stdout: String::new() };
        assert!(run(Some(0)).success());
        assert!(!run(Some(2)).success());
        assert!(!run(None).success());
    }

    #[test]
    fn missing_compiler_is_a_spawn_error() {
        let toolchain = CcToolchain::new("definitely-not-a-c-compiler-xyz", Duration::from_secs(5));
        assert!(!toolchain.is_available());
        let err = toolchain.compile("int main(void) { return 0; }").unwrap_err();
        assert!(matches!(err, ToolchainError::Spawn { ref program, .. } if program == "definitely-not-a-c-compiler-xyz"));
    }

    #[cfg(unix)]
    #[test]
    fn slow_process_is_killed() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 5");
        let started = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_millis(100), true).err();
        assert!(matches!(err, Some(ToolchainError::TimedOut(_))));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn output_is_captured() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo out; echo err >&2; exit 3");
        let finished = run_with_timeout(cmd, Duration::from_secs(5), true).ok().unwrap();
        assert_eq!(finished.status.code(), Some(3));
        assert_eq!(finished.stdout, b"out\n");
        assert_eq!(finished.stderr, b"err\n");
    }
}
