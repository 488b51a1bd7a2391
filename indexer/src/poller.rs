//! Ledger poller.
//!
//! State machine over one integer, the cursor (next height to process):
//!
//! - bootstrap: no persisted cursor, place it via [`CursorPolicy::bootstrap`];
//! - catch-up: while `cursor <= head`, fetch, apply, persist `cursor + 1`;
//! - idle: wait for the next tick;
//! - self-correction: cursor ahead of the chain, rewind via
//!   [`CursorPolicy::correct`].
//!
//! A block that fails to fetch or apply stops the cycle without advancing
//! the cursor, so the same height is retried on the next tick.

use std::time::{Duration, Instant};

use shadow_chain::{Block, ChainSource};
use shadow_store::IndexerStore;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn, Instrument};

use crate::metrics::gauge_value;
use crate::tracing_spans::{block_span, event_span};
use crate::{handlers, CursorPolicy, IndexerConfig, IndexerContext, IndexerError, ProgramEvent};

/// Result of one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every block up to `head` is processed.
    CaughtUp { next_height: u64, head: u64 },
    /// Shutdown was requested between blocks.
    Interrupted { next_height: u64 },
}

pub struct Poller<C, S> {
    chain: C,
    ctx: IndexerContext<S>,
    program_id: String,
    policy: CursorPolicy,
    poll_interval: Duration,
    cursor: Option<u64>,
}

impl<C: ChainSource, S: IndexerStore> Poller<C, S> {
    pub fn new(
        chain: C,
        ctx: IndexerContext<S>,
        config: &IndexerConfig,
    ) -> Result<Self, IndexerError> {
        let cursor = ctx.store.get_cursor()?;
        Ok(Self {
            chain,
            ctx,
            program_id: config.program_id.clone(),
            policy: config.cursor_policy(),
            poll_interval: config.poll_interval(),
            cursor,
        })
    }

    /// Next height to process, `None` before bootstrap.
    pub fn cursor(&self) -> Option<u64> {
        self.cursor
    }

    pub fn context(&self) -> &IndexerContext<S> {
        &self.ctx
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Run one catch-up cycle to the current head.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, IndexerError> {
        self.cycle(None).await
    }

    /// Poll every interval until shutdown or a fatal error.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<(), IndexerError> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            program = %self.program_id,
            interval_secs = self.poll_interval.as_secs(),
            cursor = ?self.cursor,
            "poller started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!(cursor = ?self.cursor, "poller stopping");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            match self.cycle(Some(&mut shutdown)).await {
                Ok(CycleOutcome::CaughtUp { next_height, head }) => {
                    debug!(next_height, head, "caught up");
                }
                Ok(CycleOutcome::Interrupted { next_height }) => {
                    info!(next_height, "poller stopped between blocks");
                    return Ok(());
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, cursor = ?self.cursor, "fatal indexer error");
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, cursor = ?self.cursor, "poll cycle failed, retrying next tick");
                }
            }
        }
    }

    async fn cycle(
        &mut self,
        mut shutdown: Option<&mut broadcast::Receiver<()>>,
    ) -> Result<CycleOutcome, IndexerError> {
        let head = self.chain.current_head().await?;
        self.ctx.status.set_chain_head(head);
        self.ctx.metrics.chain_head.set(gauge_value(head));

        let mut cursor = match self.cursor {
            Some(cursor) => cursor,
            None => {
                let start = self.policy.bootstrap(head);
                info!(head, start, "bootstrapping cursor");
                self.persist_cursor(start)?;
                start
            }
        };

        if let Some(corrected) = self.policy.correct(cursor, head) {
            warn!(cursor, head, corrected, "cursor ahead of chain head, stepping back");
            self.ctx.metrics.cursor_corrections.inc();
            self.persist_cursor(corrected)?;
            cursor = corrected;
        }

        while cursor <= head {
            if let Some(rx) = shutdown.as_deref_mut() {
                if shutdown_requested(rx) {
                    return Ok(CycleOutcome::Interrupted {
                        next_height: cursor,
                    });
                }
            }
            if let Err(e) = self.process_block(cursor).await {
                self.ctx.metrics.block_failures.inc();
                warn!(height = cursor, error = %e, "block processing failed");
                return Err(e);
            }
            cursor += 1;
        }

        Ok(CycleOutcome::CaughtUp {
            next_height: cursor,
            head,
        })
    }

    async fn process_block(&mut self, height: u64) -> Result<(), IndexerError> {
        let span = block_span(height);
        let started = Instant::now();
        let block = self
            .chain
            .get_block(height)
            .instrument(span.clone())
            .await?;
        span.in_scope(|| self.apply_block(height, &block))?;
        self.ctx
            .metrics
            .block_process_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        Ok(())
    }

    /// Dispatch every tracked transition, then persist the cursor past the
    /// block.
    fn apply_block(&mut self, height: u64, block: &Block) -> Result<(), IndexerError> {
        let mut applied = 0usize;
        for transition in block.program_transitions(&self.program_id) {
            let _event = event_span(&transition.function, &transition.id).entered();
            let event = match ProgramEvent::from_transition(transition) {
                Ok(Some(event)) => event,
                Ok(None) => {
                    debug!("untracked function");
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "dropping malformed event");
                    self.ctx.metrics.events_dropped.inc();
                    continue;
                }
            };
            match handlers::apply(&mut self.ctx, event, &transition.id, height) {
                Ok(()) => {
                    applied += 1;
                    self.ctx.metrics.events_applied.inc();
                }
                Err(e) if e.is_event_local() => {
                    warn!(error = %e, "dropping event");
                    self.ctx.metrics.events_dropped.inc();
                }
                Err(e) => return Err(e),
            }
        }

        self.persist_cursor(height + 1)?;
        self.ctx.metrics.blocks_processed.inc();
        if applied > 0 {
            debug!(applied, "block applied");
        }
        Ok(())
    }

    fn persist_cursor(&mut self, next: u64) -> Result<(), IndexerError> {
        self.ctx.store.put_cursor(next)?;
        self.cursor = Some(next);
        self.ctx.status.set_next_height(next);
        self.ctx.metrics.next_height.set(gauge_value(next));
        Ok(())
    }
}

fn shutdown_requested(rx: &mut broadcast::Receiver<()>) -> bool {
    !matches!(rx.try_recv(), Err(TryRecvError::Empty))
}
