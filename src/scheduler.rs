//! Virtual-clock task scheduler.
//!
//! Every timer-driven behavior (decoration cleanup, staggered entrances,
//! counter ticks, simulated network delay) goes through [`Timers`]. In the
//! browser the clock is pumped from `requestAnimationFrame` with
//! `performance.now()`; in tests it is advanced by hand, so expiry can be
//! asserted without real timers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Cancels a scheduled task. Cloning shares the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
	/// Stop the task from running. Idempotent.
	pub fn cancel(&self) {
		self.0.set(true);
	}

	/// Whether [`CancellationToken::cancel`] was called.
	pub fn is_cancelled(&self) -> bool {
		self.0.get()
	}
}

struct Task {
	due: f64,
	seq: u64,
	/// First `advance_to` pass allowed to run the task.
	pass: u64,
	token: CancellationToken,
	run: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Queue {
	now: f64,
	next_seq: u64,
	pass: u64,
	advancing: bool,
	tasks: Vec<Task>,
}

impl Queue {
	/// Remove the earliest due, non-cancelled task. Cancelled tasks are dropped.
	fn pop_due(&mut self, until: f64) -> Option<Task> {
		self.tasks.retain(|t| !t.token.is_cancelled());
		let pass = self.pass;
		let idx = self
			.tasks
			.iter()
			.enumerate()
			.filter(|(_, t)| t.due <= until && t.pass <= pass)
			.min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
			.map(|(i, _)| i)?;
		Some(self.tasks.swap_remove(idx))
	}
}

/// Cloneable handle to a shared task queue.
#[derive(Clone, Default)]
pub struct Timers {
	queue: Rc<RefCell<Queue>>,
}

impl Timers {
	/// Empty queue with the clock at zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current clock value in milliseconds.
	pub fn now(&self) -> f64 {
		self.queue.borrow().now
	}

	/// Number of tasks still waiting to run.
	pub fn pending(&self) -> usize {
		self.queue
			.borrow()
			.tasks
			.iter()
			.filter(|t| !t.token.is_cancelled())
			.count()
	}

	/// Run `task` once the clock reaches `now + delay_ms`.
	pub fn schedule(&self, delay_ms: f64, task: impl FnOnce() + 'static) -> CancellationToken {
		let token = CancellationToken::default();
		let mut queue = self.queue.borrow_mut();
		let (due, seq) = (queue.now + delay_ms.max(0.0), queue.next_seq);
		queue.next_seq += 1;
		// Due at the running instant: wait for the next pass so a task that
		// keeps rescheduling itself cannot spin forever.
		let pass = if queue.advancing && due <= queue.now {
			queue.pass + 1
		} else {
			0
		};
		queue.tasks.push(Task {
			due,
			seq,
			pass,
			token: token.clone(),
			run: Box::new(task),
		});
		token
	}

	/// Move the clock forward to `now` and run every task that became due,
	/// in due-time order. Tasks may schedule further tasks; those run in the
	/// same call if they fall due later than the scheduling task but no later
	/// than `now`. Zero-delay tasks scheduled here run on the next call.
	/// Returns the number of tasks run.
	pub fn advance_to(&self, now: f64) -> usize {
		{
			let mut queue = self.queue.borrow_mut();
			queue.pass += 1;
			queue.advancing = true;
		}
		let mut ran = 0;
		loop {
			// Borrow only while popping so tasks can reschedule themselves.
			let next = {
				let mut queue = self.queue.borrow_mut();
				let next = queue.pop_due(now);
				if let Some(ref task) = next {
					queue.now = queue.now.max(task.due);
				}
				next
			};
			let Some(task) = next else {
				break;
			};
			(task.run)();
			ran += 1;
		}
		let mut queue = self.queue.borrow_mut();
		queue.now = queue.now.max(now);
		queue.advancing = false;
		ran
	}

	/// Convenience for tests and the frame pump: advance by `delta_ms`.
	pub fn advance_by(&self, delta_ms: f64) -> usize {
		let target = self.now() + delta_ms;
		self.advance_to(target)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn runs_tasks_in_due_order() {
		let timers = Timers::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		for (delay, name) in [(300.0, "c"), (100.0, "a"), (200.0, "b")] {
			let log = log.clone();
			timers.schedule(delay, move || log.borrow_mut().push(name));
		}

		assert_eq!(timers.advance_to(150.0), 1);
		assert_eq!(*log.borrow(), vec!["a"]);
		assert_eq!(timers.advance_to(1000.0), 2);
		assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
		assert_eq!(timers.pending(), 0);
	}

	#[test]
	fn cancelled_tasks_never_run() {
		let timers = Timers::new();
		let hit = Rc::new(Cell::new(false));
		let flag = hit.clone();
		let token = timers.schedule(50.0, move || flag.set(true));
		token.cancel();

		assert_eq!(timers.advance_by(100.0), 0);
		assert!(!hit.get());
		assert_eq!(timers.pending(), 0);
	}

	#[test]
	fn tasks_can_reschedule_from_inside() {
		let timers = Timers::new();
		let count = Rc::new(Cell::new(0));

		fn tick(timers: Timers, count: Rc<Cell<u32>>) {
			count.set(count.get() + 1);
			if count.get() < 5 {
				let next = timers.clone();
				timers.schedule(16.0, move || tick(next, count));
			}
		}

		let (t, c) = (timers.clone(), count.clone());
		timers.schedule(16.0, move || tick(t, c));
		timers.advance_to(1000.0);

		assert_eq!(count.get(), 5);
		assert_eq!(timers.now(), 1000.0);
	}

	#[test]
	fn zero_delay_rescheduling_yields_to_the_next_call() {
		let timers = Timers::new();
		let count = Rc::new(Cell::new(0));

		fn spin(timers: Timers, count: Rc<Cell<u32>>) {
			count.set(count.get() + 1);
			let next = timers.clone();
			timers.schedule(0.0, move || spin(next, count));
		}

		let (t, c) = (timers.clone(), count.clone());
		timers.schedule(0.0, move || spin(t, c));
		assert_eq!(timers.advance_to(16.0), 1);
		assert_eq!(timers.advance_to(16.0), 1);
		assert_eq!(count.get(), 2);
		assert_eq!(timers.pending(), 1);
	}

	#[test]
	fn clock_reports_task_time_while_running() {
		let timers = Timers::new();
		let seen = Rc::new(Cell::new(0.0));
		let (t, s) = (timers.clone(), seen.clone());
		timers.schedule(250.0, move || s.set(t.now()));
		timers.advance_to(900.0);
		assert_eq!(seen.get(), 250.0);
	}
}
