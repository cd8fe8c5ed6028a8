use std::path::PathBuf;
use std::pin::pin;

use futures::future::{self, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, Stream, StreamExt};
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use snafu::Snafu;
use tracing::{debug, info, warn};

use crate::assembler::completion::{CompletionTracker, RecordId};
use crate::assembler::record_path::{DerivedFields, scope_path};
use crate::assembler::{
    AssemblerOptions, AssemblyEvent, AssemblyStats, ConfigurationError, IndexPolicy,
};
use crate::record::{ContentSignals, Contents, Record};
use crate::tree::{NodeRef, ScopeResolver, sort_tree};

/// A record whose scope is known and whose metadata waits to be inserted.
struct Placement {
    id: RecordId,
    record_path: PathBuf,
    scope: NodeRef,
    metadata: NodeRef,
    derived: DerivedFields,
}

enum DeferredOutcome {
    Fired(Placement),
    /// Every signal source of the record was dropped without firing.
    Abandoned(RecordId, PathBuf),
}

/// What [`Assembler::finish`] hands back once the tree is complete.
#[derive(Debug)]
pub struct CompletionReport {
    pub root: NodeRef,
    pub stats: AssemblyStats,
}

/// Streaming tree assembler.
///
/// Records are pushed one at a time and handed back right away. Records with
/// ready metadata are inserted during the push, deferred ones once their
/// content source signals. [`Assembler::finish`] resolves after the last
/// deferred insertion and the optional sort pass.
pub struct Assembler {
    root: NodeRef,
    options: AssemblerOptions,
    resolver: ScopeResolver,
    tracker: CompletionTracker,
    listeners: FuturesUnordered<LocalBoxFuture<'static, DeferredOutcome>>,
    subscribers: Vec<UnboundedSender<AssemblyEvent>>,
    stats: AssemblyStats,
    next_id: u64,
}

impl Assembler {
    pub fn new(options: AssemblerOptions) -> Result<Self, ConfigurationError> {
        let (root, options) = options.validate()?;
        let resolver = ScopeResolver::new(options.segment_match, options.keys.parent.is_some());
        debug!("Created assembler with options: {:?}", options);

        Ok(Self {
            root,
            options,
            resolver,
            tracker: CompletionTracker::new(),
            listeners: FuturesUnordered::new(),
            subscribers: Vec::new(),
            stats: AssemblyStats::default(),
            next_id: 0,
        })
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn stats(&self) -> AssemblyStats {
        self.stats
    }

    pub fn pending(&self) -> usize {
        self.tracker.pending_len()
    }

    /// Registers a new receiver of side-channel events.
    pub fn subscribe(&mut self) -> UnboundedReceiver<AssemblyEvent> {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Processes one record and forwards it.
    ///
    /// Deferred insertions whose signal already fired are applied first, so
    /// they interleave with incoming records without blocking.
    pub fn push(&mut self, mut record: Record) -> Record {
        self.apply_fired();
        self.stats.forwarded += 1;

        if matches!(record.contents(), Contents::Empty) {
            debug!("Passing '{}' through without contents", record.path().display());
            self.stats.passed_through += 1;
            return record;
        }
        let signals = match record.contents() {
            Contents::Deferred(signals) => Some(signals.clone()),
            Contents::Ready | Contents::Empty => None,
        };

        let dir = match scope_path(&record, self.options.base_prefix.as_deref()) {
            Ok(dir) => dir,
            Err(error) => {
                warn!("Skipping '{}': {}", record.path().display(), error);
                self.stats.mismatched += 1;
                self.publish(AssemblyEvent::PathMismatch(error));
                return record;
            }
        };

        let placement = Placement {
            id: self.next_record_id(),
            record_path: record.path().to_path_buf(),
            scope: self.resolver.resolve(&self.root, &dir),
            metadata: record.metadata_or_default(&self.options.keys.metadata),
            derived: DerivedFields::new(record.path(), &dir, self.options.ext_value.as_deref()),
        };

        match signals {
            None => {
                if let Some(scope) = self.place(placement) {
                    record.set_metadata_node(self.options.keys.metadata.as_str(), scope);
                }
            }
            Some(signals) => self.defer(placement, &signals),
        }
        record
    }

    /// Signals end of input and waits for every deferred record.
    ///
    /// Consumes the assembler, so completion can happen only once.
    pub async fn finish(mut self) -> Result<CompletionReport, CompletionError> {
        self.tracker.end_input();
        info!(
            "End of input after {} record(s), {} deferred record(s) pending",
            self.stats.forwarded,
            self.tracker.pending_len()
        );

        loop {
            if self.tracker.try_complete() {
                return Ok(self.complete());
            }
            match self.listeners.next().await {
                Some(outcome) => self.settle(outcome),
                None => {
                    return AbandonedRecordsSnafu {
                        paths: self.tracker.pending_paths(),
                    }
                    .fail();
                }
            }
        }
    }

    /// Pushes every record of `records`, then finishes. Returns the forwarded
    /// records in arrival order alongside the completion report.
    pub async fn assemble<S>(
        mut self,
        records: S,
    ) -> Result<(Vec<Record>, CompletionReport), CompletionError>
    where
        S: Stream<Item = Record>,
    {
        let mut records = pin!(records);
        let mut forwarded = Vec::new();
        while let Some(record) = records.next().await {
            forwarded.push(self.push(record));
        }
        let report = self.finish().await?;
        Ok((forwarded, report))
    }

    fn next_record_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    fn defer(&mut self, placement: Placement, signals: &ContentSignals) {
        debug!(
            "Deferring '{}' until one of {:?}",
            placement.record_path.display(),
            self.options.completion_events
        );
        self.stats.deferred += 1;
        self.tracker
            .register(placement.id, placement.record_path.clone());

        let receivers: Vec<_> = self
            .options
            .completion_events
            .iter()
            .map(|event| signals.listen(event))
            .collect();
        self.listeners.push(
            async move {
                // The first event to fire wins, the remaining listeners are dropped.
                match future::select_ok(receivers).await {
                    Ok(_) => DeferredOutcome::Fired(placement),
                    Err(_) => DeferredOutcome::Abandoned(placement.id, placement.record_path),
                }
            }
            .boxed_local(),
        );
    }

    fn apply_fired(&mut self) {
        while let Some(Some(outcome)) = self.listeners.next().now_or_never() {
            self.settle(outcome);
        }
    }

    fn settle(&mut self, outcome: DeferredOutcome) {
        match outcome {
            DeferredOutcome::Fired(placement) => {
                let id = placement.id;
                // Already forwarded, the record keeps its own node.
                self.place(placement);
                self.tracker.resolve(id);
            }
            DeferredOutcome::Abandoned(id, path) => {
                warn!(
                    "Signal source of record {} ('{}') went away before completing",
                    id,
                    path.display()
                );
            }
        }
    }

    /// Writes the derived fields, then stores the metadata as the scope's
    /// index descriptor or appends it to the scope's children.
    ///
    /// Returns the scope when a merged index record should carry it as its
    /// metadata from now on.
    fn place(&mut self, placement: Placement) -> Option<NodeRef> {
        let Placement {
            record_path,
            scope,
            metadata,
            derived,
            ..
        } = placement;
        let keys = &self.options.keys;

        derived.write(&mut metadata.borrow_mut(), keys);

        if self.options.index.as_deref() == Some(derived.name()) {
            if !metadata.borrow_mut().mark_attached() {
                warn!("'{}' is already in the tree", record_path.display());
                return None;
            }
            if keys.parent.is_some() {
                metadata.borrow_mut().set_parent(&scope);
            }
            self.stats.indexed += 1;
            debug!("Indexed '{}' as '{}'", record_path.display(), derived.path());
            return match self.options.index_policy {
                IndexPolicy::Nested => {
                    if scope.borrow_mut().set_index(metadata).is_some() {
                        debug!("Replaced the index of '{}'", derived.path());
                    }
                    None
                }
                IndexPolicy::Merge => {
                    let fields = metadata.borrow().fields().clone();
                    scope.borrow_mut().merge(&fields);
                    Some(scope)
                }
            };
        }

        if !metadata.borrow_mut().mark_attached() {
            warn!("'{}' is already in the tree", record_path.display());
            return None;
        }
        if keys.parent.is_some() {
            metadata.borrow_mut().set_parent(&scope);
        }
        scope.borrow_mut().push_child(metadata);
        self.stats.inserted += 1;
        debug!("Inserted '{}' at '{}'", record_path.display(), derived.href());
        None
    }

    fn complete(mut self) -> CompletionReport {
        if let Some(order) = &self.options.sort {
            let visited = sort_tree(&self.root, order, &self.options.keys);
            debug!("Sorted {} node(s) by '{}'", visited, order.key);
        }

        if !self.options.has_default_completion_events() {
            for name in self.options.completion_events.clone() {
                self.publish(AssemblyEvent::Signal { name });
            }
        }
        self.publish(AssemblyEvent::Completed { stats: self.stats });

        info!(
            "Assembly complete: {} inserted, {} indexed, {} deferred, {} skipped",
            self.stats.inserted,
            self.stats.indexed,
            self.stats.deferred,
            self.stats.mismatched
        );
        CompletionReport {
            root: self.root,
            stats: self.stats,
        }
    }

    fn publish(&mut self, event: AssemblyEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.unbounded_send(event.clone()).is_ok());
    }
}

#[derive(Debug, Snafu)]
pub enum CompletionError {
    #[snafu(display(
        "{} deferred record(s) lost their signal source before completing",
        paths.len()
    ))]
    AbandonedRecords { paths: Vec<PathBuf> },
}
