//! systemd user timer running `basar smart-update` twice a month

use crate::cache::store::{create_dir_all, FILE_MODE};
use crate::error::{BasarError, BasarResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

pub const SERVICE_NAME: &str = "basar.service";
pub const TIMER_NAME: &str = "basar.timer";

const TIMER_UNIT: &str = "\
[Unit]
Description=Update basar ISF symbol cache periodically

[Timer]
OnCalendar=*-*-01,15 06:00:00
RandomizedDelaySec=3600
Persistent=true

[Install]
WantedBy=timers.target
";

/// `~/.config/systemd/user`
pub fn unit_dir(home: &Path) -> PathBuf {
    home.join(".config").join("systemd").join("user")
}

/// Oneshot service running a low-priority smart update
pub fn render_service(binary: &Path) -> String {
    format!(
        "[Unit]
Description=Update basar ISF symbol cache
After=network-online.target
Wants=network-online.target

[Service]
Type=oneshot
ExecStart={} smart-update
Nice=19
IOSchedulingClass=idle

[Install]
WantedBy=default.target
",
        exec_path(binary)
    )
}

/// Timer firing on the 1st and 15th of each month
pub fn render_timer() -> &'static str {
    TIMER_UNIT
}

/// Quote the executable for `ExecStart=` when it contains whitespace
fn exec_path(binary: &Path) -> String {
    let path = binary.display().to_string();
    if path.chars().any(char::is_whitespace) {
        format!("\"{}\"", path.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        path
    }
}

/// Binary the service should run
///
/// The running executable, else `~/.local/bin/basar` when present,
/// else `/usr/local/bin/basar`.
pub fn resolve_binary(home: &Path) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        return exe;
    }

    let local = home.join(".local").join("bin").join("basar");
    if local.exists() {
        return local;
    }
    PathBuf::from("/usr/local/bin/basar")
}

/// Write the service and timer units, returning their paths
pub async fn write_units(home: &Path, binary: &Path) -> BasarResult<(PathBuf, PathBuf)> {
    let dir = unit_dir(home);
    create_dir_all(&dir)
        .map_err(|e| BasarError::io(format!("creating {}", dir.display()), e))?;

    let service = dir.join(SERVICE_NAME);
    let timer = dir.join(TIMER_NAME);
    write_unit(&service, &render_service(binary)).await?;
    write_unit(&timer, render_timer()).await?;

    debug!("Wrote {} and {}", service.display(), timer.display());
    Ok((service, timer))
}

async fn write_unit(path: &Path, content: &str) -> BasarResult<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options
        .open(path)
        .await
        .map_err(|e| BasarError::io(format!("creating {}", path.display()), e))?;
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))?;
    file.flush()
        .await
        .map_err(|e| BasarError::io(format!("writing {}", path.display()), e))
}

/// Install and start the update timer for the current user (Linux only)
pub async fn install_service(home: &Path) -> BasarResult<()> {
    if !cfg!(target_os = "linux") {
        return Err(BasarError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ));
    }

    let binary = resolve_binary(home);
    write_units(home, &binary).await?;

    systemctl(&["--user", "daemon-reload"]).await?;
    systemctl(&["--user", "enable", TIMER_NAME]).await?;
    systemctl(&["--user", "start", TIMER_NAME]).await?;

    info!("Installed {} for {}", TIMER_NAME, binary.display());
    Ok(())
}

async fn systemctl(args: &[&str]) -> BasarResult<()> {
    let command = format!("systemctl {}", args.join(" "));
    debug!("Running {}", command);

    let status = Command::new("systemctl")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| BasarError::CommandFailed {
            command: command.clone(),
            source: Some(e),
        })?;

    if !status.success() {
        return Err(BasarError::CommandFailed {
            command,
            source: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn service_runs_smart_update() {
        let unit = render_service(Path::new("/usr/local/bin/basar"));

        assert!(unit.contains("Type=oneshot\n"));
        assert!(unit.contains("ExecStart=/usr/local/bin/basar smart-update\n"));
        assert!(unit.contains("Nice=19\n"));
        assert!(unit.contains("IOSchedulingClass=idle\n"));
        assert!(unit.contains("WantedBy=default.target\n"));
    }

    #[test]
    fn service_quotes_path_with_spaces() {
        let unit = render_service(Path::new("/opt/my tools/basar"));
        assert!(unit.contains("ExecStart=\"/opt/my tools/basar\" smart-update\n"));
    }

    #[test]
    fn timer_schedule() {
        let unit = render_timer();

        assert!(unit.contains("OnCalendar=*-*-01,15 06:00:00\n"));
        assert!(unit.contains("RandomizedDelaySec=3600\n"));
        assert!(unit.contains("Persistent=true\n"));
        assert!(unit.contains("WantedBy=timers.target\n"));
    }

    #[test]
    fn binary_defaults_to_running_executable() {
        let home = TempDir::new().unwrap();
        assert_eq!(
            resolve_binary(home.path()),
            std::env::current_exe().unwrap()
        );
    }

    #[tokio::test]
    async fn write_units_into_user_dir() {
        let home = TempDir::new().unwrap();
        let binary = Path::new("/usr/bin/basar");

        let (service, timer) = write_units(home.path(), binary).await.unwrap();

        assert_eq!(service, home.path().join(".config/systemd/user/basar.service"));
        assert_eq!(timer, home.path().join(".config/systemd/user/basar.timer"));
        assert_eq!(
            std::fs::read_to_string(&service).unwrap(),
            render_service(binary)
        );
        assert_eq!(std::fs::read_to_string(&timer).unwrap(), render_timer());
    }
}
