use crate::cascade::resolve_cascading_deletions;
use crate::classify::classify_dependencies;
use crate::decision::{decide, DeletionDecision, Prompt};
use crate::error::{Error, Result};
use crate::identity::ResourceId;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Caller-supplied collaborator that lists resources which may depend on or
/// be owned by objects of the given kind and scope.
///
/// Implementations are expected to fail loudly; the workflow downgrades any
/// failure to "no candidates" itself, since blocking a deletion on absent
/// dependency data would be a worse default than allowing it.
pub trait RelatedLister {
    fn list_related(
        &self,
        kind: &str,
        namespace: Option<&str>,
    ) -> BoxFuture<'_, anyhow::Result<Vec<Value>>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AnalyzeOpts {
    /// Downgrade blocking findings to advisory
    pub force: bool,
}

/// Result of one driven confirm/commit interaction
#[derive(Debug)]
pub enum Outcome {
    /// User confirmed and the commit callback succeeded
    Committed,
    /// User declined
    Aborted,
    /// Decision blocked the deletion; the prompt explains why
    Blocked(Prompt),
    /// Invocation was cancelled while candidates were loading
    Stale,
}

/// Cancels analyses in flight from outside the workflow (e.g. when the
/// confirmation dialog is closed before candidates arrive)
#[derive(Clone)]
pub struct Canceller(Arc<AtomicU64>);

impl Canceller {
    pub fn cancel_pending(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Drives one-shot deletion analysis over snapshots fetched from a
/// [`RelatedLister`]. Holds no per-invocation state beyond the stale-guard
/// epoch, so independent deletion attempts may share one workflow.
pub struct DeleteWorkflow<L> {
    lister: L,
    epoch: Arc<AtomicU64>,
}

impl<L: RelatedLister> DeleteWorkflow<L> {
    pub fn new(lister: L) -> Self {
        Self {
            lister,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn canceller(&self) -> Canceller {
        Canceller(self.epoch.clone())
    }

    pub fn cancel_pending(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Fetch candidates and compute the deletion decision for `target`.
    ///
    /// `Ok(None)` means the invocation went stale: the workflow was cancelled
    /// while candidates were loading and the result must be discarded.
    pub async fn analyze(
        &self,
        target: &Value,
        opts: AnalyzeOpts,
    ) -> Result<Option<DeletionDecision>> {
        let id = ResourceId::from_object(target).ok_or(Error::MalformedTarget)?;
        let started = self.epoch.load(Ordering::SeqCst);

        let candidates = match self
            .lister
            .list_related(&id.kind, id.namespace.as_deref())
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!(
                    "listing resources related to {} failed, proceeding without dependency data: {}",
                    id,
                    e
                );
                Vec::new()
            }
        };

        if self.epoch.load(Ordering::SeqCst) != started {
            log::trace!("discarding stale analysis for {}", id);
            return Ok(None);
        }

        let findings = classify_dependencies(&id.kind_tag(), target, &candidates);
        let cascading = resolve_cascading_deletions(
            &id.kind_tag(),
            &id.name,
            id.namespace.as_deref(),
            &candidates,
        );
        log::trace!(
            "{}: {} dependency finding(s), {} cascading",
            id,
            findings.len(),
            cascading.len()
        );
        Ok(Some(decide(findings, cascading, opts.force)))
    }

    /// Full interaction: analyze, ask `confirm`, then run `commit`.
    ///
    /// A blocked decision returns [`Outcome::Blocked`] without consulting
    /// `confirm`. Commit failures surface as [`Error::Commit`]; the decision
    /// already shown is not reinterpreted.
    pub async fn run<C, F>(
        &self,
        target: &Value,
        opts: AnalyzeOpts,
        confirm: C,
        commit: F,
    ) -> Result<Outcome>
    where
        C: FnOnce(Prompt) -> BoxFuture<'static, bool>,
        F: FnOnce() -> BoxFuture<'static, anyhow::Result<()>>,
    {
        let decision = match self.analyze(target, opts).await? {
            Some(decision) => decision,
            None => return Ok(Outcome::Stale),
        };
        // analyze already validated the target shape
        let id = ResourceId::from_object(target).ok_or(Error::MalformedTarget)?;
        let prompt = decision.prompt(&id);

        if !prompt.confirm_enabled {
            return Ok(Outcome::Blocked(prompt));
        }
        if !confirm(prompt).await {
            return Ok(Outcome::Aborted);
        }
        commit().await.map_err(Error::Commit)?;
        Ok(Outcome::Committed)
    }
}
