use std::path::Path;

use maternova_id::{
    AuthorityConfig, BasicCounters, BeneficiaryProfile, IdentifierAuthority, Login, NewBeneficiary,
    ParseError, PatientId, PatientRegistry, ReconcileReport, Role, reconcile,
};
use serde::Serialize;

use crate::ledger;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginOutcome {
    Existing { profile: BeneficiaryProfile },
    Registered { profile: BeneficiaryProfile },
}

/// Logs `new` in against the ledger at `path`, appending a record when a new
/// identifier is issued.
///
/// The whole exchange runs under the ledger lock, and the reservation itself
/// re-checks the file before appending.
pub fn login(
    path: &Path,
    config: AuthorityConfig,
    new: NewBeneficiary,
) -> anyhow::Result<LoginOutcome> {
    ledger::with_exclusive(path, |registry| {
        let authority = IdentifierAuthority::with_config(BasicCounters::new(), registry, config);
        authority.prime()?;

        Ok(match authority.login(new)? {
            Login::Existing(profile) => LoginOutcome::Existing { profile },
            Login::Registered(profile) => LoginOutcome::Registered { profile },
        })
    })
}

/// Rebuilds the counters from every identifier in the ledger.
pub fn reconcile_ledger(path: &Path, config: AuthorityConfig) -> anyhow::Result<ReconcileReport> {
    ledger::with_exclusive(path, |registry| {
        Ok(reconcile(
            &BasicCounters::new(),
            config.policy,
            registry.issued_ids()?,
        )?)
    })
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub input: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseError>,
}

pub fn inspect(input: &str) -> Inspection {
    match PatientId::parse(input) {
        Ok(id) => Inspection {
            input: input.to_owned(),
            valid: true,
            role: Some(id.role()),
            display_name: Some(id.role().display_name()),
            sequence: Some(id.sequence()),
            error: None,
        },
        Err(err) => Inspection {
            input: input.to_owned(),
            valid: false,
            role: None,
            display_name: None,
            sequence: None,
            error: Some(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Barrier;
    use std::thread::scope;

    use super::*;
    use crate::ledger::Ledger;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "maternova-commands-{}-{name}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn cleanup(path: &Path) {
        let _ = std::fs::remove_file(path);
        let mut lock = path.as_os_str().to_owned();
        lock.push(".lock");
        let _ = std::fs::remove_file(lock);
    }

    fn registered(outcome: LoginOutcome) -> BeneficiaryProfile {
        match outcome {
            LoginOutcome::Registered { profile } => profile,
            LoginOutcome::Existing { profile } => {
                panic!("expected a new identifier, got existing {}", profile.patient_id)
            }
        }
    }

    #[test]
    fn login_issues_once_then_recognises() {
        let path = scratch("login");
        let config = AuthorityConfig::default();

        let profile =
            registered(login(&path, config, NewBeneficiary::new(Role::Elderly, "Ram Prasad")).unwrap());
        assert_eq!(profile.patient_id.to_string(), "200001");

        let second = login(&path, config, NewBeneficiary::new(Role::Elderly, "ram prasad")).unwrap();
        assert!(matches!(second, LoginOutcome::Existing { profile: ref p } if *p == profile));

        let third =
            registered(login(&path, config, NewBeneficiary::new(Role::Elderly, "Shyam")).unwrap());
        assert_eq!(third.patient_id.to_string(), "200002");
        assert_eq!(Ledger::load(&path).unwrap().profiles.len(), 2);
        cleanup(&path);
    }

    #[test]
    fn login_skips_identifiers_on_unreadable_rows() {
        let path = scratch("stray");
        std::fs::write(&path, "{\"patient_id\":\"100009\",\"name\":null}\n").unwrap();

        let profile = registered(
            login(&path, AuthorityConfig::default(), NewBeneficiary::new(Role::Pregnant, "Sita")).unwrap(),
        );
        assert_eq!(profile.patient_id.to_string(), "100010");
        cleanup(&path);
    }

    #[test]
    fn login_ignores_rows_whose_role_disagrees_with_prefix() {
        let path = scratch("stale-role");
        std::fs::write(
            &path,
            concat!(
                r#"{"patient_id":"100001","role":"elderly","name":"Sita","#,
                r#""phone":"9999999999","created_at_millis":0}"#,
                "\n"
            ),
        )
        .unwrap();
        let config = AuthorityConfig::default();

        let elderly =
            registered(login(&path, config, NewBeneficiary::new(Role::Elderly, "Sita")).unwrap());
        assert_eq!(elderly.patient_id.to_string(), "200001");
        assert_eq!(elderly.role, Role::Elderly);

        // The stale row still holds 100001, so it is never handed out again.
        let pregnant =
            registered(login(&path, config, NewBeneficiary::new(Role::Pregnant, "Sita")).unwrap());
        assert_eq!(pregnant.patient_id.to_string(), "100002");
        cleanup(&path);
    }

    #[test]
    fn concurrent_logins_never_share_an_identifier() {
        let path = scratch("concurrent");
        let threads = 16;
        let rounds = 5;

        for round in 0..rounds {
            let barrier = Barrier::new(threads);
            let issued: Vec<BeneficiaryProfile> = scope(|s| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let (path, barrier) = (&path, &barrier);
                        s.spawn(move || {
                            barrier.wait();
                            let new = NewBeneficiary::new(Role::Pregnant, format!("p{round}-{t}"));
                            registered(login(path, AuthorityConfig::default(), new).unwrap())
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap())
                    .collect()
            });

            let unique: HashSet<_> = issued.iter().map(|profile| profile.patient_id).collect();
            assert_eq!(unique.len(), threads, "round {round}");
        }

        let ledger = Ledger::load(&path).unwrap();
        assert!(ledger.unreadable.is_empty());
        assert_eq!(ledger.profiles.len(), threads * rounds);
        let unique: HashSet<_> = ledger.profiles.iter().map(|profile| profile.patient_id).collect();
        assert_eq!(unique.len(), threads * rounds);

        // The ledger stays usable afterwards.
        let next = registered(
            login(&path, AuthorityConfig::default(), NewBeneficiary::new(Role::Pregnant, "after")).unwrap(),
        );
        assert_eq!(
            next.patient_id.sequence(),
            u32::try_from(threads * rounds + 1).unwrap()
        );
        cleanup(&path);
    }

    #[test]
    fn reconcile_reports_bad_identifiers() {
        let path = scratch("reconcile");
        std::fs::write(&path, "{\"patient_id\":\"103\"}\n").unwrap();
        ledger::append(
            &path,
            &BeneficiaryProfile::issue(
                "100005".parse().unwrap(),
                &NewBeneficiary::new(Role::Pregnant, "Sita"),
                0,
            ),
        )
        .unwrap();

        let report = reconcile_ledger(&path, AuthorityConfig::default()).unwrap();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.counters.get(Role::Pregnant), 5);
        cleanup(&path);
    }

    #[test]
    fn inspect_explains_identifiers() {
        let ok = inspect("300012");
        assert!(ok.valid);
        assert_eq!(ok.role, Some(Role::InfantFamily));
        assert_eq!(ok.sequence, Some(12));

        let bad = inspect("600001");
        assert!(!bad.valid);
        assert_eq!(bad.error, Some(ParseError::UnknownPrefix { digit: 6 }));
    }
}
