use crate::operation::{Operation, Timestamp, TransactionId};
use crate::scheduler::checker::Violation;
use crate::scheduler::event::Event;
use crate::scheduler::Scheduler;

impl Scheduler {
    /// Abort the live incarnation of `transaction` and schedule it again.
    ///
    /// Its operations leave the accepted log, every item timestamp is rebuilt
    /// from what remains, its not yet reached pending entries are marked
    /// superseded and its whole loaded program is appended to the queue.
    pub(super) fn abort(
        &mut self,
        operation: &Operation,
        transaction: TransactionId,
        timestamp: Timestamp,
        violation: Violation,
    ) -> Event {
        let purged = self.accepted.purge(transaction);
        self.transactions.mark_aborted(transaction);
        self.items.recompute(&self.accepted, &self.transactions);
        let superseded = self.pending.supersede(transaction);
        let program = self.programs.get(&transaction).cloned().unwrap_or_default();
        let requeued = self.pending.requeue(program);

        tracing::info!(
            %transaction,
            timestamp,
            %operation,
            %violation,
            purged,
            superseded,
            requeued,
            "aborted and requeued"
        );

        Event::Aborted {
            transaction,
            timestamp,
            operation: operation.clone(),
            violation,
            purged,
            requeued,
        }
    }
}
