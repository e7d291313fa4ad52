//! The cooperative scheduler: owns the task arena and the suspension
//! forest, and advances every active task exactly one step per scheduling
//! round.
//!
//! Hosts drive it by calling [`Scheduler::tick`] from their frame loop,
//! passing a monotonic timestamp in seconds. A tick runs at least one
//! round, and keeps running rounds while activation/deactivation sets are
//! non-empty — this is what lets a parent whose last child just finished
//! resume within the same tick. The report's `idle` flag tells the host it
//! may stop ticking until new work is scheduled.

use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use log::{debug, trace, warn};

use crate::config::Config;
use crate::error::CoreError;
use crate::ids::{IdAllocator, TaskId};
use crate::outputs::{TaskEvent, TickReport};
use crate::suspend::{Parent, SuspensionTree};
use crate::task::{PendingSpawn, Step, StepCtx, Task, TaskBody, TaskState};
use crate::timer::Timer;
use crate::tween::{Tween, TweenOptions, Tweenable};

pub struct Scheduler {
    cfg: Config,
    ids: IdAllocator,
    tasks: HashMap<TaskId, Task>,
    tree: SuspensionTree,
    /// Tasks eligible to be stepped this round.
    active: HashSet<TaskId>,
    /// Pending transitions, drained at the start of each round.
    activate: HashSet<TaskId>,
    deactivate: HashSet<TaskId>,
    /// Delays requested via the implicit-timer convention, consumed on the
    /// task's next step.
    should_wait: HashMap<TaskId, f32>,
    cancel_queue: Vec<TaskId>,
    paused_since: Option<f32>,
    pause_debt: f32,
    epoch: Instant,
}

impl Scheduler {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            tasks: HashMap::new(),
            tree: SuspensionTree::new(),
            active: HashSet::new(),
            activate: HashSet::new(),
            deactivate: HashSet::new(),
            should_wait: HashMap::new(),
            cancel_queue: Vec::new(),
            paused_since: None,
            pause_debt: 0.0,
            epoch: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Wall-clock seconds since this scheduler was created. Convenience
    /// timebase for hosts without their own clock; tests pass explicit
    /// timestamps instead.
    pub fn elapsed_seconds(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }

    /// True when no task is active or about to activate; the host may stop
    /// its tick loop until something is scheduled.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.activate.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Number of live (not yet finished) tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Lifecycle state of a live task; `None` once it has finished or was
    /// cancelled (terminal states are reported through tick events).
    pub fn state(&self, task: TaskId) -> Option<TaskState> {
        self.tasks.get(&task).map(|t| t.state)
    }

    pub fn is_finished(&self, task: TaskId) -> bool {
        !self.tasks.contains_key(&task)
    }

    /// Schedule a root-level task. The body has not executed yet; it is
    /// stepped for the first time during the next tick round.
    pub fn schedule(&mut self, body: impl TaskBody + 'static) -> TaskId {
        self.admit(None, Box::new(body), Parent::Root)
    }

    /// Like [`Scheduler::schedule`], with a label used in errors and events.
    pub fn schedule_named(
        &mut self,
        label: impl Into<String>,
        body: impl TaskBody + 'static,
    ) -> TaskId {
        self.admit(Some(label.into()), Box::new(body), Parent::Root)
    }

    /// Schedule a wait of `duration` seconds.
    pub fn timer(&mut self, duration: f32) -> TaskId {
        self.schedule(Timer::new(duration))
    }

    /// Schedule a wait that invokes `on_tick(elapsed)` every step while
    /// running.
    pub fn timer_with(&mut self, duration: f32, on_tick: impl FnMut(f32) + 'static) -> TaskId {
        self.schedule(Timer::with_callback(duration, on_tick))
    }

    /// Schedule a tween sliding the value behind `get`/`set` to
    /// `end_value`. See [`TweenOptions`] for the overridable pieces.
    pub fn interpolate<T, G, S>(
        &mut self,
        get: G,
        set: S,
        end_value: T,
        opts: TweenOptions<T>,
    ) -> TaskId
    where
        T: Tweenable + 'static,
        G: FnMut() -> T + 'static,
        S: FnMut(T) + 'static,
    {
        self.schedule(Tween::new(get, set, end_value, opts))
    }

    /// Request cancellation of a task and its entire subtree. Fails fast on
    /// handles the scheduler does not know; processing happens at the next
    /// round boundary, and the task's parent (if any) resumes exactly as if
    /// the subtree had finished normally.
    pub fn cancel(&mut self, task: TaskId) -> Result<(), CoreError> {
        if !self.tasks.contains_key(&task) {
            return Err(CoreError::UnknownTask(task));
        }
        self.cancel_queue.push(task);
        Ok(())
    }

    /// Drop every task and reset all bookkeeping. The pause clock is left
    /// as-is.
    pub fn cancel_all(&mut self) {
        debug!("cancel_all: dropping {} task(s)", self.tasks.len());
        self.tasks.clear();
        self.tree.clear();
        self.active.clear();
        self.activate.clear();
        self.deactivate.clear();
        self.should_wait.clear();
        self.cancel_queue.clear();
    }

    /// Freeze the scheduler. While paused, ticks are no-ops; the host
    /// normally stops calling them altogether.
    pub fn pause(&mut self, now: f32) {
        if self.paused_since.is_none() {
            self.paused_since = Some(now);
        }
    }

    /// Unfreeze. The frozen interval is accumulated and consumed by timed
    /// sessions on their first step after resume, so their logical
    /// durations are unaffected by the pause.
    pub fn resume(&mut self, now: f32) {
        if let Some(t0) = self.paused_since.take() {
            self.pause_debt += (now - t0).max(0.0);
        }
    }

    /// Advance the world by one tick at timestamp `now` (seconds, same
    /// timebase as `pause`/`resume`).
    ///
    /// Each round: process queued cancellations, drain the transition sets,
    /// then step every active task once — a task with a pending wait spawns
    /// an implicit timer child instead of advancing. Completions are
    /// finalized at the end of the round, resuming parents whose last child
    /// ended; rounds repeat while the transition sets are non-empty.
    ///
    /// A body error propagates after the failing task and its descendants
    /// have been removed as cancelled; bookkeeping stays consistent.
    pub fn tick(&mut self, now: f32) -> Result<TickReport, CoreError> {
        let mut report = TickReport::default();
        if self.paused_since.is_some() {
            return Ok(report);
        }

        let mut spawn_buf: Vec<PendingSpawn> = Vec::new();
        let mut cancel_buf: Vec<TaskId> = Vec::new();
        let mut first_round = true;
        while first_round || !self.activate.is_empty() || !self.deactivate.is_empty() {
            first_round = false;

            let queued: Vec<TaskId> = self.cancel_queue.drain(..).collect();
            for task in queued {
                self.process_cancel(task, &mut report);
            }

            let incoming: Vec<TaskId> = self.activate.drain().collect();
            for id in incoming {
                if let Some(task) = self.tasks.get_mut(&id) {
                    task.state = TaskState::Active;
                }
                self.active.insert(id);
            }
            let outgoing: Vec<TaskId> = self.deactivate.drain().collect();
            for id in outgoing {
                self.active.remove(&id);
                if let Some(task) = self.tasks.get_mut(&id) {
                    task.state = TaskState::Standby;
                }
            }

            let snapshot: Vec<TaskId> = self.active.iter().copied().collect();
            let mut ended: Vec<TaskId> = Vec::new();
            for id in snapshot {
                if let Some(wait) = self.should_wait.remove(&id) {
                    self.spawn_timer_child(id, wait);
                    continue;
                }
                let outcome = match self.tasks.get_mut(&id) {
                    None => continue,
                    Some(task) if task.exhausted => Ok(Step::Done),
                    Some(task) => {
                        let mut ctx = StepCtx {
                            now,
                            pause_debt: self.pause_debt,
                            default_duration: self.cfg.default_duration,
                            ids: &mut self.ids,
                            spawns: &mut spawn_buf,
                            cancels: &mut cancel_buf,
                        };
                        task.body.step(&mut ctx)
                    }
                };
                report.stepped += 1;
                // Children spawned during the step attach to the stepping
                // task, which leaves the active set until they finish.
                for spawn in spawn_buf.drain(..) {
                    self.admit_child(id, spawn);
                }
                self.cancel_queue.append(&mut cancel_buf);

                match outcome {
                    Ok(Step::Yield) => {}
                    Ok(Step::Wait) => {
                        self.should_wait.insert(id, self.cfg.default_duration);
                    }
                    Ok(Step::WaitFor(duration)) => {
                        self.should_wait.insert(id, duration);
                    }
                    Ok(Step::Done) => {
                        if self.deactivate.contains(&id) {
                            // The body completed in the same step that
                            // spawned children; finalize only after they
                            // finish, without stepping the body again.
                            if let Some(task) = self.tasks.get_mut(&id) {
                                task.exhausted = true;
                            }
                        } else {
                            ended.push(id);
                        }
                    }
                    Err(source) => {
                        let label = self.task_label(id);
                        warn!("task {:?} ('{}') failed; cancelling subtree", id, label);
                        self.process_cancel(id, &mut report);
                        return Err(CoreError::TaskFailed {
                            task: id,
                            label,
                            source,
                        });
                    }
                }
            }
            // Pause debt is visible for exactly one stepping round.
            self.pause_debt = 0.0;

            for id in ended {
                self.finalize(id, &mut report);
            }
        }

        report.idle = self.active.is_empty();
        Ok(report)
    }

    fn admit(&mut self, label: Option<String>, body: Box<dyn TaskBody>, parent: Parent) -> TaskId {
        let id = self.ids.alloc_task();
        trace!("schedule {:?} (parent {:?})", id, parent);
        self.tasks.insert(
            id,
            Task {
                label,
                state: TaskState::Pending,
                exhausted: false,
                body,
            },
        );
        self.tree.insert(id, parent);
        self.activate.insert(id);
        id
    }

    fn admit_child(&mut self, parent: TaskId, spawn: PendingSpawn) {
        trace!("spawn {:?} under {:?}", spawn.id, parent);
        self.tasks.insert(
            spawn.id,
            Task {
                label: spawn.label,
                state: TaskState::Pending,
                exhausted: false,
                body: spawn.body,
            },
        );
        self.tree.insert(spawn.id, Parent::Task(parent));
        self.activate.insert(spawn.id);
        self.deactivate.insert(parent);
    }

    /// Consume a pending wait by parking the task behind an implicit timer
    /// child.
    fn spawn_timer_child(&mut self, parent: TaskId, duration: f32) {
        let id = self.ids.alloc_task();
        trace!("implicit timer {:?} ({}s) under {:?}", id, duration, parent);
        self.tasks.insert(
            id,
            Task {
                label: None,
                state: TaskState::Pending,
                exhausted: false,
                body: Box::new(Timer::new(duration)),
            },
        );
        self.tree.insert(id, Parent::Task(parent));
        self.activate.insert(id);
        self.deactivate.insert(parent);
    }

    /// End-of-round completion: remove the task and resume its parent if
    /// this was the parent's last outstanding child.
    fn finalize(&mut self, id: TaskId, report: &mut TickReport) {
        self.active.remove(&id);
        self.activate.remove(&id);
        self.deactivate.remove(&id);
        self.should_wait.remove(&id);
        let label = self.tasks.remove(&id).and_then(|t| t.label);
        if let Some((Parent::Task(parent), true)) = self.tree.remove(id) {
            self.activate.insert(parent);
        }
        report.push_event(TaskEvent::Finished { task: id, label });
    }

    /// Cascade removal of a task and its transitive descendants. To the
    /// parent this is indistinguishable from the subtree finishing: it
    /// resumes immediately if its child set empties.
    fn process_cancel(&mut self, root: TaskId, report: &mut TickReport) {
        if !self.tasks.contains_key(&root) {
            // Finished between being queued and the queue draining.
            return;
        }
        if let Some((Parent::Task(parent), true)) = self.tree.detach_from_parent(root) {
            self.active.insert(parent);
            if let Some(task) = self.tasks.get_mut(&parent) {
                task.state = TaskState::Active;
            }
        }
        let doomed = self.tree.subtree(root);
        debug!("cancel {:?}: removing {} task(s)", root, doomed.len());
        for id in doomed {
            self.tree.purge(id);
            self.active.remove(&id);
            self.activate.remove(&id);
            self.deactivate.remove(&id);
            self.should_wait.remove(&id);
            let label = self.tasks.remove(&id).and_then(|t| t.label);
            report.push_event(TaskEvent::Cancelled { task: id, label });
        }
    }

    fn task_label(&self, id: TaskId) -> String {
        self.tasks
            .get(&id)
            .and_then(|t| t.label.clone())
            .unwrap_or_else(|| format!("task-{}", id.0))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
