//! Infrastructure implementation of the `CreditLedger` port.
//!
//! `FileLedger` keeps the tenant → balance mapping in a flat JSON file with
//! atomic write (temp file + rename). Every read-modify-write cycle runs on
//! the blocking thread pool and holds an in-process lock for its whole
//! duration — this is the serialization the conditional debit relies on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::ports::CreditLedger;
use crate::domain::error::LedgerError;

/// File-backed credit ledger.
pub struct FileLedger {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

type Balances = BTreeMap<String, u64>;

fn io_err(path: &Path, source: std::io::Error) -> LedgerError {
    LedgerError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl FileLedger {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn load_sync(path: &Path) -> Result<Balances, LedgerError> {
        if !path.exists() {
            return Ok(Balances::new());
        }
        let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        serde_json::from_str(&content).map_err(|e| LedgerError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn save_sync(path: &Path, balances: &Balances) -> Result<(), LedgerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(path, e))?;
        }
        let content = serde_json::to_string_pretty(balances).map_err(|e| LedgerError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Atomic write via temp file then rename.
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content).map_err(|e| io_err(&temp_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| io_err(&temp_path, e))?;
        }

        std::fs::rename(&temp_path, path).map_err(|e| io_err(path, e))
    }

    /// Run `f` over the parsed ledger on the blocking pool, holding the
    /// in-process lock for the whole read-modify-write cycle. `f` returns
    /// the value to surface and whether the ledger must be persisted.
    async fn with_ledger<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Balances) -> Result<(T, bool), LedgerError> + Send + 'static,
    {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);
        tokio::task::spawn_blocking(move || {
            let _guard = lock
                .lock()
                .map_err(|_| LedgerError::Internal("ledger lock poisoned".to_string()))?;
            let mut balances = Self::load_sync(&path)?;
            let (value, dirty) = f(&mut balances)?;
            if dirty {
                Self::save_sync(&path, &balances)?;
            }
            Ok(value)
        })
        .await
        .map_err(|e| LedgerError::Internal(format!("ledger task panicked: {e}")))?
    }
}

impl CreditLedger for FileLedger {
    async fn balance(&self, tenant: &str) -> Result<u64, LedgerError> {
        let tenant = tenant.to_owned();
        self.with_ledger(move |balances| Ok((balances.get(&tenant).copied().unwrap_or(0), false)))
            .await
    }

    async fn try_reserve(&self, tenant: &str) -> Result<bool, LedgerError> {
        Ok(self.balance(tenant).await? > 0)
    }

    async fn commit_debit(&self, tenant: &str, amount: u64) -> Result<u64, LedgerError> {
        let tenant = tenant.to_owned();
        self.with_ledger(move |balances| {
            let have = balances.get(&tenant).copied().unwrap_or(0);
            if have < amount {
                return Err(LedgerError::InsufficientBalance { have, need: amount });
            }
            let remaining = have - amount;
            balances.insert(tenant, remaining);
            Ok((remaining, true))
        })
        .await
    }

    async fn deposit(&self, tenant: &str, amount: u64) -> Result<u64, LedgerError> {
        let tenant = tenant.to_owned();
        self.with_ledger(move |balances| {
            let next = balances.get(&tenant).copied().unwrap_or(0).saturating_add(amount);
            balances.insert(tenant, next);
            Ok((next, true))
        })
        .await
    }
}
