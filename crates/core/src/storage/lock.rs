use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

// One async mutex per document path, shared by every store instance in the
// process. Writers in other processes are not coordinated.
type WriteLocks = Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>;

static WRITE_LOCKS: OnceLock<WriteLocks> = OnceLock::new();

fn lock_key_for_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Writer lock guarding read-modify-write cycles on the document at `path`.
pub fn write_lock_for(path: &Path) -> Arc<tokio::sync::Mutex<()>> {
    let key = lock_key_for_path(path);
    let locks = WRITE_LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut locks = locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    locks
        .entry(key)
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_shares_one_lock() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_lock_for(&dir.path().join("portfolio.json"));
        let b = write_lock_for(&dir.path().join("portfolio.json"));
        let c = write_lock_for(&dir.path().join("other.json"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
