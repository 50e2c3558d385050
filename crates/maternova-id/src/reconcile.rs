//! Re-deriving the per-role counters from identifiers already in storage.
//!
//! Reconciliation is a best-effort recovery pass. Every identifier that parses
//! and belongs to a counted role lifts that role's counter to at least its
//! sequence; anything that does not parse is skipped, counted and logged.
//! Counters are merged with `max`, never overwritten, so the pass can be
//! repeated with stale or partial snapshots without ever moving a counter
//! backwards.

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{CounterBank, CounterSnapshot, IssuancePolicy, ParseError, PatientId, Result, Role};

/// An input entry that reconciliation could not use.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkippedIdentifier {
    /// Position of the entry in the input sequence.
    pub index: usize,
    /// The entry, verbatim.
    pub input: String,
    /// Why it was skipped.
    pub reason: ParseError,
}

/// What a reconciliation pass saw and did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReconcileReport {
    /// Number of entries read.
    pub scanned: usize,
    /// Well-formed entries whose role is counted under the active policy.
    pub applied: usize,
    /// Well-formed entries whose role is not counted (ASHA and unknown
    /// prefixes under [`IssuancePolicy::Clock`]).
    pub ignored: usize,
    /// Malformed entries, in input order.
    pub skipped: Vec<SkippedIdentifier>,
    /// Roles whose counter moved forward during this pass.
    pub raised: Vec<Role>,
    /// Counters after the pass.
    pub counters: CounterSnapshot,
}

impl ReconcileReport {
    /// Whether every entry was well-formed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Primes `counters` from a snapshot of previously issued identifiers.
///
/// For every well-formed identifier whose role `policy` counts, the role's
/// counter becomes `max(current, sequence)`. Malformed entries (wrong width,
/// non-digit characters, unassigned prefix) are reported in
/// [`ReconcileReport::skipped`] and otherwise ignored.
///
/// The pass never lowers a counter and may run at any time, including while
/// other threads generate from the same bank.
///
/// # Errors
///
/// May return an error if a lock-based bank is poisoned. Malformed input is
/// never an error.
///
/// # Example
/// ```
/// use maternova_id::{BasicCounters, IssuancePolicy, Role, reconcile};
///
/// let counters = BasicCounters::new();
/// let report = reconcile(&counters, IssuancePolicy::default(), ["103", "100005"]).unwrap();
///
/// assert_eq!(report.skipped.len(), 1);
/// assert_eq!(report.counters.get(Role::Pregnant), 5);
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(policy = %policy)))]
pub fn reconcile<C, I, S>(counters: &C, policy: IssuancePolicy, issued: I) -> Result<ReconcileReport>
where
    C: CounterBank + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ReconcileReport::default();
    let mut observed: [Option<u32>; Role::COUNT] = [None; Role::COUNT];

    for (index, entry) in issued.into_iter().enumerate() {
        let input = entry.as_ref();
        report.scanned += 1;

        let id = match PatientId::parse(input) {
            Ok(id) => id,
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(index, input, %reason, "skipping malformed patient identifier");
                report.skipped.push(SkippedIdentifier {
                    index,
                    input: input.to_owned(),
                    reason,
                });
                continue;
            }
        };

        let role = id.role();
        if !policy.is_sequential(role) {
            report.ignored += 1;
            continue;
        }

        report.applied += 1;
        let seen = &mut observed[role.index()];
        *seen = Some(seen.map_or(id.sequence(), |max| max.max(id.sequence())));
    }

    for role in Role::ALL {
        let Some(max) = observed[role.index()] else {
            continue;
        };
        let previous = counters.raise_to(role, max)?;
        if max > previous {
            #[cfg(feature = "tracing")]
            tracing::debug!(%role, from = previous, to = max, "raised counter");
            report.raised.push(role);
        }
    }

    report.counters = counters.snapshot()?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        scanned = report.scanned,
        applied = report.applied,
        ignored = report.ignored,
        skipped = report.skipped.len(),
        raised = report.raised.len(),
        "reconciled patient identifier counters"
    );

    Ok(report)
}
