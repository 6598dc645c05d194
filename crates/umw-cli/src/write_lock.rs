use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use umw_config::PROJECT_DIR;

const LOCK_FILE: &str = "store.write.lock";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(120);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Removes the lock file on drop.
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Wait for `{project}/.umwelt/store.write.lock`. Locks left by a process that
/// no longer runs are removed.
pub async fn acquire_for_project(project_root: &Path) -> anyhow::Result<WriteLockGuard> {
    let lock_path = project_root.join(PROJECT_DIR).join(LOCK_FILE);
    let started = std::time::Instant::now();

    loop {
        match try_acquire(&lock_path) {
            Ok(guard) => return Ok(guard),
            Err(LockState::Stale) => {
                tracing::warn!(path = %lock_path.display(), "removing stale write lock");
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(state) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    return Err(timeout_error(&state, &lock_path));
                }
                tracing::debug!(?state, "waiting for store write lock");
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
        }
    }
}

fn timeout_error(state: &LockState, lock_path: &Path) -> anyhow::Error {
    match state {
        LockState::HeldBy(pid) => anyhow::anyhow!(
            "another store rewrite is running (pid {pid}); try again after it finishes"
        ),
        LockState::Stale | LockState::Unknown => anyhow::anyhow!(
            "could not acquire write lock at {}; remove it if no umw process is running",
            lock_path.display()
        ),
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(u32),
    Stale,
    Unknown,
}

fn try_acquire(lock_path: &Path) -> Result<WriteLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut pid_buf = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut pid_buf))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            match pid_buf.trim().parse::<u32>().ok() {
                Some(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Some(_) => Err(LockState::Stale),
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: u32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}

#[cfg(test)]
mod tests {
    use super::{LockState, try_acquire};

    #[test]
    fn acquires_and_releases_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".umwelt/store.write.lock");

        let guard = try_acquire(&lock_path).expect("lock should acquire");
        assert!(lock_path.is_file());
        drop(guard);
        assert!(!lock_path.exists());
    }

    #[test]
    fn live_holder_blocks_second_acquire() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".umwelt/store.write.lock");

        let _guard = try_acquire(&lock_path).expect("lock should acquire");
        assert!(matches!(try_acquire(&lock_path), Err(LockState::HeldBy(_))));
    }

    #[test]
    fn unreadable_pid_is_unknown() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join("store.write.lock");
        std::fs::write(&lock_path, "not-a-pid").expect("lock should write");

        assert!(matches!(try_acquire(&lock_path), Err(LockState::Unknown)));
    }
}
