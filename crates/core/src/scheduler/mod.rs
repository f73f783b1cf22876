use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use hashbrown::HashMap;

use self::checker::Access;
use self::error::Error;
use self::event::Event;
use self::snapshot::Snapshot;
use crate::history::scenario::Scenario;
use crate::history::{AcceptedLog, PendingQueue};
use crate::operation::{parse_operation, Operation, TransactionId};
use crate::registry::{DataItem, ItemRegistry, Transaction, TransactionRegistry};

pub mod checker;
pub mod error;
pub mod event;
pub mod invariants;
mod restart;
pub mod snapshot;

pub use invariants::InvariantViolation;

/// Lifecycle of a run.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No history loaded.
    #[default]
    NotStarted,
    /// A history is loaded and operations remain.
    Running,
    /// The pending queue ran empty. Further steps change nothing.
    Completed,
}

/// What one call to [`Scheduler::step`] did.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based step counter.
    pub step: u64,
    /// The pending entry that was taken.
    pub operation: Operation,
    pub events: Vec<Event>,
}

/// Result of [`Scheduler::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing loaded; nothing done.
    NotStarted,
    /// The run is over; nothing done.
    Completed,
    /// One pending entry was processed.
    Advanced(StepReport),
}

/// A basic timestamp ordering run over one history.
///
/// All mutable state of a run lives here. Dropping the value or calling
/// [`Scheduler::reset`] discards it; independent runs use independent
/// schedulers.
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    state: State,
    transactions: TransactionRegistry,
    items: ItemRegistry,
    accepted: AcceptedLog,
    pending: PendingQueue,
    /// Every transaction's operations in the loaded history, in order. This
    /// is what gets requeued when the transaction aborts.
    programs: HashMap<TransactionId, Vec<Operation>>,
    steps_taken: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scheduler already loaded with `scenario`.
    #[must_use]
    pub fn with_scenario(scenario: &Scenario) -> Self {
        let mut scheduler = Self::new();
        scheduler.load_operations(scenario.operations.clone());
        scheduler
    }

    /// Parse `tokens` and start a fresh run over them.
    ///
    /// Every token is validated before anything changes, so on error the
    /// scheduler keeps its previous state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedOperation`] for the first token that does
    /// not match the operation grammar, with its position.
    pub fn load<I>(&mut self, tokens: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let operations = tokens
            .into_iter()
            .enumerate()
            .map(|(position, token)| {
                parse_operation(token.as_ref()).map_err(|err| err.at(position))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.load_operations(operations);
        Ok(())
    }

    /// Start a fresh run over already parsed operations.
    pub fn load_operations(&mut self, operations: Vec<Operation>) {
        *self = Self::default();
        for operation in &operations {
            self.programs
                .entry(operation.transaction())
                .or_default()
                .push(operation.clone());
        }
        tracing::debug!(
            operations = operations.len(),
            transactions = self.programs.len(),
            "history loaded"
        );
        self.pending = PendingQueue::new(operations);
        self.state = State::Running;
    }

    /// Discard all state and return to [`State::NotStarted`].
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Process exactly one pending entry.
    ///
    /// Does nothing and returns [`Step::NotStarted`] / [`Step::Completed`]
    /// outside of a running history.
    pub fn step(&mut self) -> Step {
        match self.state {
            State::NotStarted => return Step::NotStarted,
            State::Completed => return Step::Completed,
            State::Running => {}
        }

        let Some(entry) = self.pending.advance() else {
            self.complete();
            return Step::Completed;
        };
        self.steps_taken += 1;

        let mut events = Vec::new();
        let operation = entry.operation;
        if entry.superseded {
            tracing::warn!(%operation, "skipping operation of a restarted transaction");
            events.push(Event::SkippedStale {
                operation: operation.clone(),
            });
        } else {
            match &operation {
                Operation::Read { transaction, item } => {
                    self.access(Access::Read, &operation, *transaction, item, &mut events);
                }
                Operation::Write { transaction, item } => {
                    self.access(Access::Write, &operation, *transaction, item, &mut events);
                }
                Operation::Commit { transaction } => {
                    self.commit(&operation, *transaction, &mut events);
                }
            }
        }

        if self.pending.is_exhausted() {
            self.complete();
            events.push(Event::Completed);
        }

        Step::Advanced(StepReport {
            step: self.steps_taken,
            operation,
            events,
        })
    }

    /// Step until the run completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepLimitExceeded`] if `max_steps` steps did not
    /// finish the run. The scheduler stays valid and can be stepped further.
    pub fn run(&mut self, max_steps: u64) -> Result<Vec<StepReport>, Error> {
        let mut reports = Vec::new();
        let mut taken = 0;
        while self.state == State::Running {
            if taken == max_steps {
                return Err(Error::StepLimitExceeded { limit: max_steps });
            }
            if let Step::Advanced(report) = self.step() {
                reports.push(report);
            }
            taken += 1;
        }
        Ok(reports)
    }

    fn access(
        &mut self,
        access: Access,
        operation: &Operation,
        transaction: TransactionId,
        item: &str,
        events: &mut Vec<Event>,
    ) {
        let (record, created) = self.transactions.get_or_create(transaction);
        let timestamp = record.timestamp;
        if created {
            tracing::debug!(%transaction, timestamp, "transaction started");
            events.push(Event::TransactionStarted {
                transaction,
                timestamp,
            });
        }

        let data = self.items.get_or_create(item);
        match checker::check(access, timestamp, data) {
            Ok(changed) => {
                tracing::debug!(%operation, timestamp, rts = data.rts, wts = data.wts, "accepted");
                let item = data.clone();
                record.operations.push(operation.clone());
                self.accepted.push(operation.clone());
                events.push(Event::Accepted {
                    operation: operation.clone(),
                    timestamp,
                    item,
                    changed,
                });
            }
            Err(violation) => {
                let event = self.abort(operation, transaction, timestamp, violation);
                events.push(event);
            }
        }
    }

    fn commit(&mut self, operation: &Operation, transaction: TransactionId, events: &mut Vec<Event>) {
        let Some(record) = self.transactions.mark_committed(transaction) else {
            tracing::warn!(%operation, "commit of a transaction that is not active");
            events.push(Event::SkippedCommit {
                operation: operation.clone(),
            });
            return;
        };
        record.operations.push(operation.clone());
        let timestamp = record.timestamp;
        self.accepted.push(operation.clone());
        tracing::info!(%transaction, timestamp, "committed");
        events.push(Event::Committed {
            transaction,
            timestamp,
        });
    }

    fn complete(&mut self) {
        self.state = State::Completed;
        tracing::info!(
            steps = self.steps_taken,
            accepted = self.accepted.len(),
            aborts = self.transactions.aborted_ids().len(),
            "history completed"
        );
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub const fn accepted(&self) -> &AcceptedLog {
        &self.accepted
    }

    #[must_use]
    pub const fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    #[must_use]
    pub const fn transactions(&self) -> &TransactionRegistry {
        &self.transactions
    }

    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    #[must_use]
    pub const fn items(&self) -> &ItemRegistry {
        &self.items
    }

    #[must_use]
    pub fn item(&self, name: &str) -> Option<&DataItem> {
        self.items.get(name)
    }

    /// Operations of `transaction` in the loaded history.
    #[must_use]
    pub fn program(&self, transaction: TransactionId) -> Option<&[Operation]> {
        self.programs.get(&transaction).map(Vec::as_slice)
    }

    #[must_use]
    pub fn aborted_ids(&self) -> &[TransactionId] {
        self.transactions.aborted_ids()
    }

    #[must_use]
    pub fn abort_counts(&self) -> BTreeMap<TransactionId, usize> {
        self.transactions.abort_counts()
    }

    #[must_use]
    pub const fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}
