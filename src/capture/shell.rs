use super::types::FrameProvider;
use crate::error::{ProbeError, ProbeResult};
use std::path::PathBuf;
use std::process::Output;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Captures screenshots by running `adb exec-out screencap -p`.
#[derive(Debug, Clone)]
pub struct AdbShellCapture {
    pub adb_path: PathBuf,
    pub serial: Option<String>,
    pub timeout: Option<Duration>,
}

impl AdbShellCapture {
    pub fn new(adb_path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: adb_path.into(),
            serial: None,
            timeout: None,
        }
    }

    pub fn with_serial(mut self, serial: Option<String>) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments after the executable for a single PNG screenshot.
    pub fn screencap_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5);
        if let Some(serial) = &self.serial {
            args.push("-s".to_string());
            args.push(serial.clone());
        }
        args.extend(["exec-out", "screencap", "-p"].map(String::from));
        args
    }

    async fn ensure_adb_available(&self) -> ProbeResult<()> {
        let output = self.run(&["version".to_string()]).await.map_err(|e| match e {
            ProbeError::Io { source } if source.kind() == std::io::ErrorKind::NotFound => {
                ProbeError::capture_unavailable(format!(
                    "'{}' not found. Install Android Platform Tools (https://developer.android.com/tools/adb) or pass --adb=PATH.",
                    self.adb_path.display()
                ))
            }
            ProbeError::Io { source } => ProbeError::capture_unavailable(format!(
                "Failed to invoke '{}': {source}",
                self.adb_path.display()
            )),
            other => other,
        })?;
        if !output.status.success() {
            return Err(ProbeError::capture_unavailable(format!(
                "'{} version' returned non-zero ({})",
                self.adb_path.display(),
                output.status
            )));
        }
        Ok(())
    }

    async fn run(&self, args: &[String]) -> ProbeResult<Output> {
        let mut cmd = Command::new(&self.adb_path);
        cmd.args(args).kill_on_drop(true);
        match self.timeout {
            Some(duration) => tokio::time::timeout(duration, cmd.output())
                .await
                .map_err(|_| ProbeError::CaptureTimeout { duration })?
                .map_err(ProbeError::from),
            None => cmd.output().await.map_err(ProbeError::from),
        }
    }
}

impl FrameProvider for AdbShellCapture {
    async fn capture_bytes(&self) -> ProbeResult<Vec<u8>> {
        self.ensure_adb_available().await?;

        let start = Instant::now();
        let output = self.run(&self.screencap_args()).await.map_err(|e| match e {
            ProbeError::Io { source } => {
                ProbeError::capture_unavailable(format!("Failed to run adb screencap: {source}"))
            }
            other => other,
        })?;
        if !output.status.success() {
            return Err(ProbeError::capture_unavailable(format!(
                "adb screencap failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        log::debug!(
            "screencap returned {} bytes in {}ms",
            output.stdout.len(),
            start.elapsed().as_millis()
        );
        Ok(output.stdout)
    }

    fn describe(&self) -> String {
        match &self.serial {
            Some(serial) => format!("{} -s {serial}", self.adb_path.display()),
            None => self.adb_path.display().to_string(),
        }
    }
}
