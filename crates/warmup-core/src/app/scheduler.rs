//! GroupedScheduler - グループ単位の並列実行とグループ間の逐次実行
//!
//! # フロー
//! 1. 登録済み initializer を順序キーでグループ化（昇順）
//! 2. グループ内の initializer を全て spawn
//! 3. 全ての完了を待つ（失敗があっても兄弟タスクはキャンセルしない）
//! 4. 登録順に走査し、最初の失敗を代表エラーとして返す
//! 5. 失敗したグループ以降のグループは一切開始しない

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::domain::{InitEvent, OrderKey, RunError, RunState, RunSummary, TaskError};
use crate::ports::{EventSink, Initializer};

use super::grouping::{Group, group_by_order};
use super::registry::{InitializerSource, OrderedInitializer};

/// Runs registered initializers group by group.
///
/// Holds no state between runs: every `run()` regroups the entries,
/// resolves factories again as each group is reached and executes every
/// initializer from scratch. A panicking factory fails its own member the
/// same way a panicking initializer does.
/// Must be called from within a Tokio runtime.
pub struct GroupedScheduler {
    entries: Vec<OrderedInitializer>,
    sink: Arc<dyn EventSink>,
}

impl GroupedScheduler {
    pub fn new(entries: Vec<OrderedInitializer>, sink: Arc<dyn EventSink>) -> Self {
        Self { entries, sink }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every group in ascending key order, stopping at the first failing group.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let started_at = Utc::now();
        let groups = group_by_order(&self.entries);
        let tasks: usize = groups.iter().map(Group::len).sum();

        self.sink.emit(InitEvent::RunStarted {
            groups: groups.len(),
            tasks,
        });

        let mut state = RunState::start(groups.len());
        debug!(?state, groups = groups.len(), "initialization state");

        while let RunState::Running { group } = state {
            let result = run_group(&groups[group], &self.sink).await;
            state = state.after_group(groups.len(), result.is_ok());
            debug!(?state, "initialization state");

            if let Err(err) = result {
                self.sink.emit(InitEvent::RunFailed {
                    error: err.to_string(),
                });
                return Err(err);
            }
        }

        let summary = RunSummary {
            groups: groups.len(),
            tasks,
            started_at,
            finished_at: Utc::now(),
        };
        self.sink.emit(InitEvent::RunSucceeded {
            elapsed_ms: summary.elapsed_ms(),
        });
        Ok(summary)
    }
}

/// Run one group: spawn every member, join all, pick the representative error.
///
/// Factories are resolved here, when the group is reached. Siblings of a
/// failing initializer are never cancelled. The reported error belongs to
/// the earliest-registered failing member, whatever the completion order was.
pub async fn run_group(group: &Group, sink: &Arc<dyn EventSink>) -> Result<(), RunError> {
    let (names, launches): (Vec<String>, Vec<Launch>) = group
        .sources
        .iter()
        .map(|source| launch(source, group.order, sink))
        .unzip();

    let joined = join_all(launches.into_iter().map(Launch::settle)).await;

    let mut representative = None;
    for (name, result) in names.into_iter().zip(joined) {
        let outcome = result.unwrap_or_else(|join_err| {
            // the task died before it could report, so report for it
            let err = task_error_from_join(join_err);
            sink.emit(InitEvent::TaskFailed {
                initializer: name.clone(),
                order: group.order,
                error: err.to_string(),
            });
            Err(err)
        });

        if let Err(source) = outcome {
            if representative.is_none() {
                representative = Some(RunError::TaskFailure {
                    initializer: name,
                    order: group.order,
                    source,
                });
            }
        }
    }

    match representative {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// A group member after the launch attempt.
enum Launch {
    Spawned(JoinHandle<Result<(), TaskError>>),
    /// Its factory panicked, so there was nothing to spawn.
    NotStarted(TaskError),
}

impl Launch {
    async fn settle(self) -> Result<Result<(), TaskError>, JoinError> {
        match self {
            Launch::Spawned(handle) => handle.await,
            Launch::NotStarted(err) => Ok(Err(err)),
        }
    }
}

fn launch(
    source: &InitializerSource,
    order: OrderKey,
    sink: &Arc<dyn EventSink>,
) -> (String, Launch) {
    match panic::catch_unwind(AssertUnwindSafe(|| source.resolve())) {
        Ok(initializer) => {
            let name = initializer.name().to_string();
            let handle = spawn_initializer(initializer, order, Arc::clone(sink));
            (name, Launch::Spawned(handle))
        }
        Err(payload) => {
            let name = source.name().to_string();
            let err = TaskError::factory_panicked(&panic_detail(&*payload));
            sink.emit(InitEvent::TaskFailed {
                initializer: name.clone(),
                order,
                error: err.to_string(),
            });
            (name, Launch::NotStarted(err))
        }
    }
}

fn spawn_initializer(
    initializer: Arc<dyn Initializer>,
    order: OrderKey,
    sink: Arc<dyn EventSink>,
) -> JoinHandle<Result<(), TaskError>> {
    tokio::spawn(async move {
        let name = initializer.name().to_string();
        sink.emit(InitEvent::TaskStarted {
            initializer: name.clone(),
            order,
        });

        let started = Instant::now();
        let result = initializer.initialize().await;

        match &result {
            Ok(()) => sink.emit(InitEvent::TaskSucceeded {
                initializer: name,
                order,
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
            Err(err) => sink.emit(InitEvent::TaskFailed {
                initializer: name,
                order,
                error: err.to_string(),
            }),
        }
        result
    })
}

fn task_error_from_join(err: JoinError) -> TaskError {
    match err.try_into_panic() {
        Ok(payload) => TaskError::panicked(&panic_detail(&*payload)),
        Err(err) => TaskError::with_source("initializer was cancelled", err),
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
