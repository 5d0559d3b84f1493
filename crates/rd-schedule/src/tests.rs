//! Unit tests for rd-schedule.

use rd_core::Tick;

use crate::EventQueue;

#[cfg(test)]
mod event_queue {
    use super::*;

    #[test]
    fn empty_queue() {
        let mut q: EventQueue<u32> = EventQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.next_tick(), None);
        assert!(q.pop().is_none());
        assert_eq!(q.now(), Tick::ZERO);
    }

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push_at(Tick(30), "c");
        q.push_at(Tick(10), "a");
        q.push_at(Tick(20), "b");
        let order: Vec<_> = std::iter::from_fn(|| q.pop()).collect();
        assert_eq!(order, vec![(Tick(10), "a"), (Tick(20), "b"), (Tick(30), "c")]);
    }

    #[test]
    fn equal_time_is_fifo() {
        let mut q = EventQueue::new();
        for i in 0..5 {
            q.push_at(Tick(7), i);
        }
        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|(_, e)| e).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn next_tick_runs_after_already_queued_same_time_events() {
        let mut q = EventQueue::new();
        q.push_at(Tick(5), "first");
        q.push_at(Tick(5), "second");
        let (t, e) = q.pop().unwrap();
        assert_eq!((t, e), (Tick(5), "first"));
        // Pushed while processing tick 5.
        q.push_next_tick("retry");
        assert_eq!(q.pop(), Some((Tick(5), "second")));
        assert_eq!(q.pop(), Some((Tick(5), "retry")));
    }

    #[test]
    fn past_ticks_are_clamped_to_now() {
        let mut q = EventQueue::new();
        q.push_at(Tick(10), 1);
        q.pop();
        q.push_at(Tick(3), 2);
        assert_eq!(q.pop(), Some((Tick(10), 2)));
        assert_eq!(q.now(), Tick(10));
    }

    #[test]
    fn push_after_is_relative_to_now() {
        let mut q = EventQueue::new();
        q.push_at(Tick(4), 0);
        q.pop();
        q.push_after(20, 1);
        assert_eq!(q.next_tick(), Some(Tick(24)));
    }

    #[test]
    fn rescheduling_is_additive() {
        let mut q = EventQueue::new();
        q.push_at(Tick(1), 'x');
        q.push_at(Tick(1), 'x');
        assert_eq!(q.len(), 2);
        assert_eq!(q.tick_count(), 1);
    }

    #[test]
    fn pop_before_respects_bound() {
        let mut q = EventQueue::new();
        q.push_at(Tick(5), 0);
        q.push_at(Tick(10), 1);
        assert_eq!(q.pop_before(Tick(10)), Some((Tick(5), 0)));
        assert_eq!(q.pop_before(Tick(10)), None);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn now_is_monotonic() {
        let mut q = EventQueue::new();
        q.push_at(Tick(2), 0);
        q.push_at(Tick(9), 1);
        let mut last = Tick::ZERO;
        while let Some((t, _)) = q.pop() {
            assert!(t >= last);
            last = t;
            if t == Tick(2) {
                q.push_at(Tick(1), 2); // clamped to 2
            }
        }
        assert_eq!(q.now(), Tick(9));
    }

    #[test]
    fn pending_at_preserves_order() {
        let mut q = EventQueue::new();
        q.push_at(Tick(3), 'a');
        q.push_at(Tick(3), 'b');
        let pending: Vec<_> = q.pending_at(Tick(3)).copied().collect();
        assert_eq!(pending, vec!['a', 'b']);
        assert_eq!(q.pending_at(Tick(4)).count(), 0);
    }
}
