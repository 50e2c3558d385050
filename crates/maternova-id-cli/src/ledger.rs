use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use maternova_id::{BeneficiaryProfile, PatientId, PatientRegistry, Reservation, Role};
use serde::Deserialize;

/// The contents of a JSON-lines ledger.
#[derive(Debug, Default)]
pub struct Ledger {
    /// Records that deserialized cleanly.
    pub profiles: Vec<BeneficiaryProfile>,
    /// Lines that did not, as `(line number, patient_id field)`. The field is
    /// kept so reconciliation can report the bad identifier and issuance
    /// never hands it out again.
    pub unreadable: Vec<(usize, Option<String>)>,
}

#[derive(Deserialize)]
struct RawRow {
    patient_id: Option<serde_json::Value>,
}

impl Ledger {
    /// Reads `path`. A missing file is an empty ledger; blank lines are
    /// ignored.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "ledger not found, starting empty");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to open {}", path.display()));
            }
        };

        let mut ledger = Self::default();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let number = index + 1;
            match serde_json::from_str::<BeneficiaryProfile>(&line) {
                Ok(profile) => match profile.check() {
                    Ok(()) => ledger.profiles.push(profile),
                    Err(err) => {
                        tracing::warn!(line = number, id = %profile.patient_id, %err, "inconsistent ledger row");
                        ledger
                            .unreadable
                            .push((number, Some(profile.patient_id.to_string())));
                    }
                },
                Err(err) => {
                    tracing::warn!(line = number, %err, "unreadable ledger row");
                    let patient_id = serde_json::from_str::<RawRow>(&line)
                        .ok()
                        .and_then(|row| row.patient_id)
                        .map(|value| match value {
                            serde_json::Value::String(text) => text,
                            other => other.to_string(),
                        });
                    ledger.unreadable.push((number, patient_id));
                }
            }
        }

        tracing::debug!(
            profiles = ledger.profiles.len(),
            unreadable = ledger.unreadable.len(),
            "loaded ledger"
        );
        Ok(ledger)
    }

    /// Every identifier in the ledger, readable rows first.
    pub fn issued_ids(&self) -> Vec<String> {
        self.profiles
            .iter()
            .map(|profile| profile.patient_id.to_string())
            .chain(self.stray_ids())
            .collect()
    }

    /// Identifiers found on rows that could not be used as records.
    pub fn stray_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.unreadable.iter().filter_map(|(_, id)| id.clone())
    }
}

/// Appends one record to `path`, creating the file if needed.
pub fn append(path: &Path, profile: &BeneficiaryProfile) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for append", path.display()))?;
    let mut line = serde_json::to_string(profile)?;
    line.push('\n');
    file.write_all(line.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// A ledger file seen as a [`PatientRegistry`].
///
/// Only [`with_exclusive`] hands one out, so every read and every
/// reservation runs while this process holds the ledger lock. `reserve`
/// re-reads the file and appends only when the identifier is absent.
#[derive(Debug)]
pub struct LedgerRegistry {
    path: PathBuf,
}

impl LedgerRegistry {
    fn load(&self) -> maternova_id::Result<Ledger> {
        Ledger::load(&self.path).map_err(storage)
    }
}

fn storage(err: anyhow::Error) -> maternova_id::Error {
    maternova_id::Error::Storage {
        message: format!("{err:#}"),
    }
}

impl PatientRegistry for LedgerRegistry {
    fn issued_ids(&self) -> maternova_id::Result<Vec<String>> {
        Ok(self.load()?.issued_ids())
    }

    fn reserve(&self, profile: &BeneficiaryProfile) -> maternova_id::Result<Reservation> {
        let id = profile.patient_id.to_string();
        if self.load()?.issued_ids().contains(&id) {
            return Ok(Reservation::Taken);
        }
        append(&self.path, profile).map_err(storage)?;
        Ok(Reservation::Reserved)
    }

    fn find(&self, role: Role, name: &str) -> maternova_id::Result<Option<BeneficiaryProfile>> {
        Ok(self
            .load()?
            .profiles
            .into_iter()
            .find(|profile| profile.matches(role, name)))
    }

    fn get(&self, id: PatientId) -> maternova_id::Result<Option<BeneficiaryProfile>> {
        Ok(self
            .load()?
            .profiles
            .into_iter()
            .find(|profile| profile.patient_id == id))
    }
}

/// Sidecar file whose OS lock guards the ledger at `path`.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Runs `f` while holding an exclusive lock on the ledger at `path`.
///
/// The lock is an OS file lock on `<ledger>.lock`, so it excludes other
/// processes as well as other threads of this one, and is released when the
/// holder exits.
pub fn with_exclusive<T>(
    path: &Path,
    f: impl FnOnce(&LedgerRegistry) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("failed to open {}", lock_path.display()))?;

    let mut lock = fd_lock::RwLock::new(file);
    let _guard = lock
        .write()
        .with_context(|| format!("failed to lock {}", lock_path.display()))?;
    tracing::debug!(path = %path.display(), "acquired ledger lock");

    f(&LedgerRegistry {
        path: path.to_path_buf(),
    })
}
