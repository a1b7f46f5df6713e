//! Registry engine orchestration.
//!
//! [`RegistryEngine`] is the single entry point for registry operations.
//! It owns the admission voter, the oracle pipeline, and the event bus,
//! and delegates durable state to the [`LedgerStore`] it is built over.
//!
//! Every state-changing operation is gated on the registry's operating
//! switch; views and the operator's own switch control are not, so a
//! halted registry can still be inspected and resumed.

use crate::{
    admission::{AdmissionOutcome, AdmissionVoter},
    config::RegistryConfig,
    errors::RegistryError,
    events::{EventBus, OracleEvent},
    ledger::LedgerStore,
    oracle::{
        aggregation::{ResponseAggregator, SubmissionOutcome},
        entropy::EntropySource,
        requests::{FlightRequest, RequestKey, RequestRegistry},
        sampler::IndexSampler,
        shards::{ReporterRegistry, ShardAssigner, ShardSet},
        OracleError,
    },
    types::{AccountId, Amount, FlightStatus},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Handle returned when a flight-status request is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedRequest {
    /// Shard the request was routed to.
    pub shard: u8,
    /// Key the stored request is tracked under.
    pub key: RequestKey,
}

/// The registry's consensus core.
///
/// Construction wires the subsystems together from one configuration and
/// one ledger handle; the engine itself holds no durable state. All
/// operations are synchronous and safe to call from multiple threads.
pub struct RegistryEngine {
    config: RegistryConfig,
    operator: AccountId,
    ledger: Arc<dyn LedgerStore>,
    voter: AdmissionVoter,
    sampler: Arc<IndexSampler>,
    assigner: ShardAssigner,
    reporters: ReporterRegistry,
    requests: RequestRegistry,
    aggregator: ResponseAggregator,
    events: EventBus,
}

impl RegistryEngine {
    /// Builds an engine over `ledger` with entropy drawn from `entropy`.
    ///
    /// The `operator` account may nominate carriers regardless of
    /// membership and is the only account allowed to flip the operating
    /// switch.
    #[must_use]
    pub fn new(
        config: RegistryConfig,
        operator: AccountId,
        ledger: Arc<dyn LedgerStore>,
        entropy: Arc<dyn EntropySource>,
    ) -> Self {
        let sampler = Arc::new(IndexSampler::new(
            entropy,
            config.oracle.shard_count,
            config.oracle.entropy_lookback,
        ));
        let assigner = ShardAssigner::new(Arc::clone(&sampler), config.oracle.max_draw_attempts);
        let voter = AdmissionVoter::new(Arc::clone(&ledger), config.admission.bootstrap_threshold);
        let aggregator = ResponseAggregator::new(Arc::clone(&ledger), config.oracle.quorum_size);
        let events = EventBus::new(config.events.channel_capacity);

        Self {
            config,
            operator,
            ledger,
            voter,
            sampler,
            assigner,
            reporters: ReporterRegistry::new(),
            requests: RequestRegistry::new(),
            aggregator,
            events,
        }
    }

    /// Nominates `candidate` for membership on behalf of `caller`.
    ///
    /// While fewer carriers than the bootstrap threshold are admitted the
    /// candidate joins immediately; afterwards the nomination counts as one
    /// vote toward a majority of current members.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Halted`] when the registry is not
    /// operational, [`RegistryError::NotAuthorized`] when the caller is
    /// neither the operator nor a funded member,
    /// [`RegistryError::CandidateAlreadyMember`] when the candidate is
    /// already admitted, and [`RegistryError::Admission`] for duplicate
    /// votes or ledger failures.
    pub fn propose_admission(
        &self,
        caller: AccountId,
        candidate: AccountId,
        candidate_name: &str,
    ) -> Result<AdmissionOutcome, RegistryError> {
        self.ensure_operational()?;

        if !self.may_nominate(caller)? {
            return Err(RegistryError::NotAuthorized(caller));
        }
        if self.ledger.is_carrier_registered(candidate)? {
            return Err(RegistryError::CandidateAlreadyMember(candidate));
        }

        let member_count = self.ledger.carrier_count()?;
        Ok(self.voter.propose(candidate_name, candidate, caller, member_count)?)
    }

    /// Records membership stake for an admitted carrier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::StakeBelowMinimum`] when `amount` is under
    /// the configured minimum, and [`RegistryError::Ledger`] when the
    /// carrier is unknown.
    pub fn fund_membership(&self, carrier: AccountId, amount: Amount) -> Result<(), RegistryError> {
        self.ensure_operational()?;

        let required = self.config.admission.min_carrier_stake;
        if amount < required {
            return Err(RegistryError::StakeBelowMinimum { offered: amount, required });
        }

        self.ledger.receive_funding(carrier, amount)?;
        Ok(())
    }

    /// Registers `reporter` as a data reporter and assigns its shards.
    ///
    /// Registering an already registered account draws a fresh assignment
    /// and replaces the old one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Oracle`] when the fee is below the
    /// configured minimum or the shard draw exhausts its attempts.
    pub fn register_reporter(
        &self,
        reporter: AccountId,
        fee: Amount,
    ) -> Result<ShardSet, RegistryError> {
        self.ensure_operational()?;

        let required = self.config.oracle.reporter_fee;
        if fee < required {
            return Err(OracleError::FeeBelowMinimum { offered: fee, required }.into());
        }

        let shards = self.assigner.assign(reporter)?;
        self.reporters.register(reporter, shards);
        Ok(shards)
    }

    /// The shard assignment of a registered reporter.
    ///
    /// Available even while the registry is halted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Oracle`] when the reporter is not
    /// registered.
    pub fn assigned_shards(&self, reporter: AccountId) -> Result<ShardSet, RegistryError> {
        Ok(self.reporters.shards_of(reporter).ok_or(OracleError::ReporterUnknown(reporter))?)
    }

    /// Announces a flight operated by a funded carrier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] unless `carrier` is an
    /// admitted, funded member.
    pub fn register_flight(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<(), RegistryError> {
        self.ensure_operational()?;

        if !self.ledger.is_carrier_funded(carrier)? {
            return Err(RegistryError::NotAuthorized(carrier));
        }

        self.ledger.register_flight(carrier, flight, departure)?;
        Ok(())
    }

    /// Opens a flight-status request and routes it to a drawn shard.
    ///
    /// Opening the same flight again replaces the stored request but keeps
    /// any responses already gathered under its key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Halted`] when the registry is not
    /// operational.
    pub fn open_flight_request(
        &self,
        requester: AccountId,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<OpenedRequest, RegistryError> {
        self.ensure_operational()?;

        let shard = self.sampler.draw(requester);
        let key = RequestKey::derive(shard, carrier, flight, departure);

        self.requests.open(
            key,
            FlightRequest {
                shard,
                carrier,
                flight: flight.to_string(),
                departure,
                requested_by: requester,
                opened_at: Utc::now(),
                open: true,
            },
        );

        info!(
            key = %key,
            shard,
            carrier = %carrier,
            flight = %flight,
            "flight-status request opened"
        );
        self.events.publish(OracleEvent::RequestOpened {
            shard,
            carrier,
            flight: flight.to_string(),
            departure,
        });

        Ok(OpenedRequest { shard, key })
    }

    /// Submits a reporter's status response for an open request.
    ///
    /// Reporters answer with the fields carried by
    /// [`OracleEvent::RequestOpened`]; the request key is recomputed from
    /// them. The response counts toward the quorum of its
    /// `(request, status)` bucket. The submission that crosses quorum
    /// settles payouts for actionable statuses before it is recorded; on a
    /// ledger failure the bucket is untouched and the reporter can
    /// resubmit.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Oracle`] when the reporter is unknown, the
    /// reporter does not hold `shard`, or the recomputed key matches no
    /// open request. Returns [`RegistryError::Ledger`] when payout
    /// settlement fails.
    pub fn submit_response(
        &self,
        reporter: AccountId,
        shard: u8,
        carrier: AccountId,
        flight: &str,
        departure: i64,
        status: FlightStatus,
    ) -> Result<SubmissionOutcome, RegistryError> {
        self.ensure_operational()?;

        let shards = self
            .reporters
            .shards_of(reporter)
            .ok_or(OracleError::ReporterUnknown(reporter))?;
        if !shards.contains(shard) {
            return Err(OracleError::ShardNotAssigned { reporter, shard }.into());
        }

        let key = RequestKey::derive(shard, carrier, flight, departure);
        let request = self
            .requests
            .get(key)
            .filter(|request| request.open)
            .ok_or(OracleError::UnknownRequest(key))?;

        let outcome = self.aggregator.record(&request, key, status, reporter)?;

        self.events.publish(OracleEvent::ResponseRecorded {
            carrier: request.carrier,
            flight: request.flight.clone(),
            departure: request.departure,
            status,
        });
        if outcome.finalized {
            self.events.publish(OracleEvent::RequestFinalized {
                carrier: request.carrier,
                flight: request.flight.clone(),
                departure: request.departure,
                status,
            });
        }

        Ok(outcome)
    }

    /// Records a coverage purchase against a flight.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ZeroCoverageAmount`] when `amount` is zero.
    pub fn purchase_coverage(
        &self,
        buyer: AccountId,
        carrier: AccountId,
        flight: &str,
        departure: i64,
        amount: Amount,
    ) -> Result<(), RegistryError> {
        self.ensure_operational()?;

        if amount == 0 {
            return Err(RegistryError::ZeroCoverageAmount);
        }

        self.ledger.record_purchase(buyer, carrier, flight, departure, amount)?;
        Ok(())
    }

    /// Drains the caller's credited balance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Ledger`] when the account holds nothing.
    pub fn withdraw_funds(&self, account: AccountId) -> Result<Amount, RegistryError> {
        self.ensure_operational()?;
        Ok(self.ledger.pay_out(account)?)
    }

    /// Whether the registry is accepting state-changing operations.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Ledger`] when the ledger cannot answer.
    pub fn is_operational(&self) -> Result<bool, RegistryError> {
        Ok(self.ledger.is_operational()?)
    }

    /// Flips the registry's operating switch. Operator only.
    ///
    /// Deliberately not gated on the switch itself, so a halted registry
    /// can be resumed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] for any other caller.
    pub fn set_operating_status(
        &self,
        caller: AccountId,
        operational: bool,
    ) -> Result<(), RegistryError> {
        if caller != self.operator {
            warn!(caller = %caller, "rejected operating-status change from non-operator");
            return Err(RegistryError::NotAuthorized(caller));
        }

        self.ledger.set_operating_status(operational)?;
        info!(operational, "registry operating status changed");
        Ok(())
    }

    /// Opens a receiver for engine events published from this point on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OracleEvent> {
        self.events.subscribe()
    }

    /// The operator account this engine was built with.
    #[must_use]
    pub fn operator(&self) -> AccountId {
        self.operator
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Votes recorded in the current admission round.
    #[must_use]
    pub fn pending_votes(&self) -> usize {
        self.voter.pending_votes()
    }

    fn ensure_operational(&self) -> Result<(), RegistryError> {
        if self.ledger.is_operational()? {
            Ok(())
        } else {
            Err(RegistryError::Halted)
        }
    }

    fn may_nominate(&self, caller: AccountId) -> Result<bool, RegistryError> {
        if caller == self.operator {
            return Ok(true);
        }
        Ok(self.ledger.is_carrier_registered(caller)?
            && self.ledger.is_carrier_funded(caller)?)
    }
}
