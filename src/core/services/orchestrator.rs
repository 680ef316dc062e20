//! Verification orchestrator - the full attendance decision pipeline
//!
//! `verify` runs a fixed sequence of checks and stops at the first one that
//! fails:
//!
//! 1. identity lookup (`NotRegistered`)
//! 2. group assignment (`NoGroupAssigned`)
//! 3. active session (`NoActiveSession`)
//! 4. classroom binding (`ClassroomConfigMissing`)
//! 5. subnet co-location (`LocationMismatch`)
//! 6. reference embeddings (`IncompleteReferenceData`)
//! 7. biometric vote (`BiometricMismatch`)
//! 8. session credit (`AlreadyCredited`, or `Ok`)
//!
//! Input validation happens before any store access. Store failures abort
//! the pipeline as [`VerifyError::Store`] and are never reported as a policy
//! outcome. Exactly one log event is emitted per request.

use log::{error, info, warn};

use crate::core::error::VerifyError;
use crate::core::models::{
    Identity, KeyFormat, RegistrationKind, VerificationOutcome, VerificationPolicy,
};
use crate::core::ports::{
    AddressSource, ClassroomStore, Clock, IdentityStore, LedgerStore, ScheduleStore,
};
use crate::core::services::ledger::{CreditOutcome, try_credit};
use crate::core::services::{SubnetPolicy, find_active_session, matcher, validator};

const LOG_TARGET: &str = "rollcall::verify";

/// The backing stores the orchestrator reads and writes through
#[derive(Clone, Copy)]
pub struct Stores<'a> {
    /// Students and reference embeddings
    pub identities: &'a dyn IdentityStore,
    /// Class schedules
    pub schedules: &'a dyn ScheduleStore,
    /// Classroom network bindings
    pub classrooms: &'a dyn ClassroomStore,
    /// Attendance counters
    pub ledger: &'a dyn LedgerStore,
}

impl<'a> Stores<'a> {
    /// Use one backend for every store
    #[must_use]
    pub fn uniform<S>(store: &'a S) -> Self
    where
        S: IdentityStore + ScheduleStore + ClassroomStore + LedgerStore,
    {
        Self {
            identities: store,
            schedules: store,
            classrooms: store,
            ledger: store,
        }
    }
}

impl std::fmt::Debug for Stores<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// Composes the core services into the `verify` and `register` operations
///
/// Holds no state between calls beyond its configuration.
pub struct Orchestrator<'a> {
    stores: Stores<'a>,
    clock: &'a dyn Clock,
    policy: VerificationPolicy,
    subnet: SubnetPolicy,
    keys: KeyFormat,
}

impl std::fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("policy", &self.policy)
            .field("subnet", &self.subnet)
            .field("keys", &self.keys.as_str())
            .finish_non_exhaustive()
    }
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator with default key format and subnet policy
    #[must_use]
    pub fn new(stores: Stores<'a>, clock: &'a dyn Clock, policy: VerificationPolicy) -> Self {
        Self {
            stores,
            clock,
            policy,
            subnet: SubnetPolicy::default(),
            keys: KeyFormat::default(),
        }
    }

    /// Replace the subnet policy
    #[must_use]
    pub fn with_subnet_policy(mut self, subnet: SubnetPolicy) -> Self {
        self.subnet = subnet;
        self
    }

    /// Replace the student key format
    #[must_use]
    pub fn with_key_format(mut self, keys: KeyFormat) -> Self {
        self.keys = keys;
        self
    }

    /// The matching policy in effect
    #[must_use]
    pub const fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    /// Decide a verification request and credit attendance on success
    pub fn verify(
        &self,
        key: &str,
        live: &[f32],
        origin: &dyn AddressSource,
    ) -> Result<VerificationOutcome, VerifyError> {
        let result = self.decide(key, live, origin);
        match &result {
            Ok(outcome) => log_outcome(key, outcome),
            Err(err) => error!(
                target: LOG_TARGET,
                "status=error identity={key} retryable={} error={err}",
                err.is_retryable()
            ),
        }
        result
    }

    /// Store a full reference set for `key`, replacing any previous one
    ///
    /// The averaged vector is stored as the single fallback reference.
    pub fn register(&self, key: &str, embeddings: &[Vec<f32>]) -> Result<RegistrationKind, VerifyError> {
        self.keys.check(key)?;
        validator::validate_batch(
            embeddings,
            self.policy.reference_count,
            self.policy.embedding_dimension,
        )?;

        let fallback = validator::average(embeddings);
        let kind =
            self.stores.identities.replace_embeddings(key, embeddings, &fallback, self.clock.now())?;
        info!(
            target: LOG_TARGET,
            "status=registered identity={key} kind={kind} references={}",
            embeddings.len()
        );
        Ok(kind)
    }

    fn decide(
        &self,
        key: &str,
        live: &[f32],
        origin: &dyn AddressSource,
    ) -> Result<VerificationOutcome, VerifyError> {
        self.keys.check(key)?;
        validator::validate(live, self.policy.embedding_dimension)?;

        let now = self.clock.now();

        let Some(identity) = self.stores.identities.get_by_key(key)? else {
            return Ok(VerificationOutcome::NotRegistered {
                identity: key.to_string(),
            });
        };

        let Some(group) = identity.assigned_group() else {
            return Ok(VerificationOutcome::NoGroupAssigned {
                identity: key.to_string(),
            });
        };

        let sessions = self.stores.schedules.list_sessions_for_group(group)?;
        let Some(session) = find_active_session(group, now.time(), &sessions) else {
            return Ok(VerificationOutcome::NoActiveSession {
                group: group.to_string(),
                at: now.time(),
            });
        };

        let Some(binding) = self.stores.classrooms.get_binding(&session.room)? else {
            return Ok(VerificationOutcome::ClassroomConfigMissing {
                subject: session.subject,
                room: session.room,
            });
        };

        let requester = origin.requester_address();
        let co_located = requester
            .as_deref()
            .is_some_and(|addr| self.subnet.co_located(addr, &binding.address));
        if !co_located {
            return Ok(VerificationOutcome::LocationMismatch {
                room: session.room,
                requester,
                classroom_address: binding.address,
            });
        }

        let stored = self.stores.identities.get_reference_embeddings(key)?;
        let found = stored.len();
        let Some((references, required_matches)) = self.reference_set(&identity, stored) else {
            return Ok(VerificationOutcome::IncompleteReferenceData {
                found,
                expected: self.policy.reference_count,
            });
        };

        let report = matcher::verify(
            live,
            &references,
            self.policy.similarity_threshold,
            required_matches,
        );
        let best_score = report.best_score();
        if !report.verified {
            return Ok(VerificationOutcome::BiometricMismatch {
                scores: report.scores,
                match_count: report.match_count,
                required_matches,
                best_score,
            });
        }

        let credit = try_credit(self.stores.ledger, key, &session.subject, session.window(), now)?;
        Ok(match credit {
            CreditOutcome::AlreadyCreditedForSession { last_credit, .. } => {
                VerificationOutcome::AlreadyCredited {
                    subject: session.subject,
                    last_credit,
                }
            },
            CreditOutcome::Credited(entry) => VerificationOutcome::Credited {
                percentage: entry.percentage(),
                attended: entry.attended,
                total: entry.total,
                best_score,
                scores: report.scores,
                match_count: report.match_count,
                credited_at: entry.last_credit.unwrap_or(now),
                subject: session.subject,
            },
        })
    }

    /// Pick the references to vote with, and how many votes are required
    ///
    /// A complete, valid reference set uses the configured `min_matches`.
    /// Otherwise a valid fallback vector is used alone with one vote required.
    fn reference_set(&self, identity: &Identity, stored: Vec<Vec<f32>>) -> Option<(Vec<Vec<f32>>, usize)> {
        let dim = self.policy.embedding_dimension;

        if validator::validate_batch(&stored, self.policy.reference_count, dim).is_ok() {
            return Some((stored, self.policy.min_matches));
        }

        identity
            .fallback_embedding
            .as_ref()
            .filter(|fallback| validator::validate(fallback, dim).is_ok())
            .map(|fallback| (vec![fallback.clone()], 1))
    }
}

/// One structured event per terminal branch, keyed by status
fn log_outcome(key: &str, outcome: &VerificationOutcome) {
    let status = outcome.status();
    match outcome {
        VerificationOutcome::Credited {
            subject,
            percentage,
            best_score,
            match_count,
            ..
        } => info!(
            target: LOG_TARGET,
            "status={status} identity={key} subject={subject} percentage={percentage:.2} best_score={best_score:.4} matches={match_count}"
        ),
        VerificationOutcome::LocationMismatch {
            room,
            requester,
            classroom_address,
        } => warn!(
            target: LOG_TARGET,
            "status={status} identity={key} room={room} requester={} classroom_address={classroom_address}",
            requester.as_deref().unwrap_or("-")
        ),
        VerificationOutcome::BiometricMismatch {
            match_count,
            required_matches,
            best_score,
            ..
        } => warn!(
            target: LOG_TARGET,
            "status={status} identity={key} matches={match_count}/{required_matches} best_score={best_score:.4}"
        ),
        VerificationOutcome::NoActiveSession { group, at } => info!(
            target: LOG_TARGET,
            "status={status} identity={key} group={group} at={}",
            at.format("%H:%M:%S")
        ),
        VerificationOutcome::AlreadyCredited { subject, last_credit } => info!(
            target: LOG_TARGET,
            "status={status} identity={key} subject={subject} last_credit={last_credit}"
        ),
        VerificationOutcome::ClassroomConfigMissing { subject, room } => info!(
            target: LOG_TARGET,
            "status={status} identity={key} subject={subject} room={room}"
        ),
        VerificationOutcome::IncompleteReferenceData { found, expected } => info!(
            target: LOG_TARGET,
            "status={status} identity={key} found={found} expected={expected}"
        ),
        VerificationOutcome::NotRegistered { .. } | VerificationOutcome::NoGroupAssigned { .. } => {
            info!(target: LOG_TARGET, "status={status} identity={key}");
        },
    }
}
