//! Runs the OpenSCAD command line to turn .scad programs into STL

use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::BatchError;

/// How often a running render is polled for completion
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle on an OpenSCAD executable
#[derive(Debug, Clone)]
pub struct OpenScad {
    binary: PathBuf,
    timeout: Duration,
}

impl OpenScad {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn unavailable(&self, e: std::io::Error) -> BatchError {
        BatchError::OpenScadUnavailable(format!("{}: {}", self.binary.display(), e))
    }

    /// Version string reported by `openscad --version`.
    ///
    /// OpenSCAD prints it on stderr; stdout is used when stderr is empty.
    pub fn version(&self) -> Result<String, BatchError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| self.unavailable(e))?;
        if !output.status.success() {
            return Err(BatchError::OpenScadUnavailable(format!(
                "{} exited with {}",
                self.binary.display(),
                output.status
            )));
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Ok(stderr)
        }
    }

    /// Render `scad` to `stl`, killing OpenSCAD if it exceeds the timeout.
    pub fn render_stl(&self, scad: &Path, stl: &Path) -> Result<(), BatchError> {
        debug!("{} -o {} {}", self.binary.display(), stl.display(), scad.display());
        let mut child = Command::new(&self.binary)
            .arg("-o")
            .arg(stl)
            .arg(scad)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(e))?;

        // Drain stderr on a separate thread so a chatty render cannot block on a full pipe
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                buf
            })
        });

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BatchError::OpenScadTimeout {
                    file: scad.display().to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(BatchError::OpenScadFailed {
                file: scad.display().to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use std::fs;
    #[cfg(unix)]
    use std::sync::Mutex;

    // Writing a script while another test thread forks can leave it busy
    // for exec, so stubs are written and run one test at a time.
    #[cfg(unix)]
    static STUB_LOCK: Mutex<()> = Mutex::new(());

    /// Shell script standing in for openscad; `body` handles a render call
    #[cfg(unix)]
    fn stub(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("openscad");
        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo \"OpenSCAD version 2021.01\" >&2; exit 0; fi\n{}\n",
            body
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let openscad = OpenScad::new("/nonexistent/openscad-binary", Duration::from_secs(1));
        assert!(matches!(openscad.version(), Err(BatchError::OpenScadUnavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_version_read_from_stderr() {
        let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let openscad = OpenScad::new(stub(dir.path(), "exit 0"), Duration::from_secs(5));
        assert_eq!(openscad.version().unwrap(), "OpenSCAD version 2021.01");
    }

    #[cfg(unix)]
    #[test]
    fn test_render_writes_output() {
        let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), "echo \"solid label\" > \"$2\"");
        let scad = dir.path().join("label.scad");
        let stl = dir.path().join("label.stl");
        fs::write(&scad, "cube(1);").unwrap();
        OpenScad::new(bin, Duration::from_secs(5))
            .render_stl(&scad, &stl)
            .unwrap();
        assert_eq!(fs::read_to_string(&stl).unwrap().trim(), "solid label");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_reports_stderr() {
        let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), "echo \"ERROR: Parser error in line 3\" >&2\nexit 1");
        let scad = dir.path().join("label.scad");
        fs::write(&scad, "cube(").unwrap();
        let result = OpenScad::new(bin, Duration::from_secs(5))
            .render_stl(&scad, &dir.path().join("label.stl"));
        match result {
            Err(BatchError::OpenScadFailed { file, stderr }) => {
                assert!(file.ends_with("label.scad"));
                assert_eq!(stderr, "ERROR: Parser error in line 3");
            }
            other => panic!("expected OpenScadFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_render_times_out() {
        let _guard = STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), "exec sleep 10");
        let scad = dir.path().join("label.scad");
        fs::write(&scad, "cube(1);").unwrap();
        let started = Instant::now();
        let result = OpenScad::new(bin, Duration::from_secs(1))
            .render_stl(&scad, &dir.path().join("label.stl"));
        assert!(matches!(result, Err(BatchError::OpenScadTimeout { secs: 1, .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
