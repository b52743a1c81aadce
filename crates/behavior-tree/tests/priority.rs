use std::cell::Cell;
use std::rc::Rc;

use behavior_tree::BehaviorValue::{Active, Waiting};
use behavior_tree::{
    Behavior, BehaviorValue, ConcurrentNode, FixedPriorityNode, arbitration, builder,
};
use coroutine::{Instruction, Node, Result, from_iter};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Calls received by a probed behavior.
#[derive(Default)]
struct Calls {
    updates: Cell<u32>,
    resets: Cell<u32>,
    disposes: Cell<u32>,
}

impl Calls {
    fn clear(&self) {
        self.updates.set(0);
        self.resets.set(0);
        self.disposes.set(0);
    }
}

/// Counts the calls its parent makes on the wrapped behavior.
struct Probe {
    inner: Box<dyn Behavior>,
    calls: Rc<Calls>,
}

fn probe(inner: Box<dyn Behavior>) -> (Box<dyn Behavior>, Rc<Calls>) {
    let calls = Rc::new(Calls::default());
    let probe = Probe {
        inner,
        calls: Rc::clone(&calls),
    };
    (Box::new(probe), calls)
}

impl Node<BehaviorValue> for Probe {
    fn value(&self) -> Option<BehaviorValue> {
        self.inner.value()
    }

    fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    fn update(&mut self) -> Result<()> {
        self.calls.updates.set(self.calls.updates.get() + 1);
        self.inner.update()
    }

    fn reset(&mut self) -> Result<()> {
        self.calls.resets.set(self.calls.resets.get() + 1);
        self.inner.reset()
    }

    fn dispose(&mut self) -> Result<()> {
        self.calls.disposes.set(self.calls.disposes.get() + 1);
        self.inner.dispose()
    }
}

impl Behavior for Probe {}

/// Behavior reporting whatever `switch` holds when it is updated.
fn switched(switch: &Rc<Cell<BehaviorValue>>) -> Box<dyn Behavior> {
    let switch = Rc::clone(switch);
    builder::behavior(move || {
        let switch = Rc::clone(&switch);
        from_iter(std::iter::repeat_with(move || Instruction::Emit(switch.get())))
    })
}

fn mask_states(mask: u32, len: usize) -> Vec<BehaviorValue> {
    (0..len)
        .map(|index| BehaviorValue::from_active(mask & (1 << index) != 0))
        .collect()
}

#[test]
fn preemption_at_tick_ten() {
    init_tracing();
    let a = builder::behavior(|| {
        from_iter(
            std::iter::repeat_with(|| Instruction::Emit(Waiting))
                .take(10)
                .chain(std::iter::repeat_with(|| Instruction::Emit(Active))),
        )
    });
    let b = builder::behavior(|| from_iter(std::iter::repeat_with(|| Instruction::Emit(Active))));
    let (a, a_calls) = probe(a);
    let (b, b_calls) = probe(b);
    let mut node = FixedPriorityNode::new(vec![a, b]);

    for tick in 0..10 {
        node.update().unwrap();
        assert_eq!(node.winner_index(), Some(1), "tick {tick}");
        assert_eq!(node.state(), Active);
        assert_eq!(b_calls.resets.get(), 0, "tick {tick}");
        assert_eq!(a_calls.resets.get(), 0, "tick {tick}");
    }

    node.update().unwrap();
    assert_eq!(node.winner_index(), Some(0));
    assert_eq!(b_calls.resets.get(), 1);
    assert_eq!(b_calls.updates.get(), 10);

    // B stays frozen while A keeps winning.
    for _ in 0..10 {
        node.update().unwrap();
    }
    assert_eq!(b_calls.resets.get(), 1);
    assert_eq!(b_calls.updates.get(), 10);
    assert_eq!(a_calls.updates.get(), 21);
    assert_eq!(a_calls.resets.get(), 0);
}

#[test]
fn lowest_active_index_wins_and_later_children_are_not_ticked() {
    init_tracing();
    for len in 1..=4 {
        for mask in 0..(1u32 << len) {
            let switches: Vec<_> = mask_states(mask, len)
                .into_iter()
                .map(|state| Rc::new(Cell::new(state)))
                .collect();
            let (children, calls): (Vec<_>, Vec<_>) =
                switches.iter().map(|switch| probe(switched(switch))).unzip();
            let mut node = FixedPriorityNode::new(children);

            node.update().unwrap();

            let expected = (0..len).find(|index| mask & (1 << index) != 0);
            assert_eq!(node.winner_index(), expected, "mask {mask:b}");
            assert_eq!(node.state(), BehaviorValue::from_active(expected.is_some()));

            let scanned = expected.map_or(len, |winner| winner + 1);
            for (index, calls) in calls.iter().enumerate() {
                let ticked = u32::from(index < scanned);
                assert_eq!(calls.updates.get(), ticked, "mask {mask:b}, child {index}");
            }
        }
    }
}

#[test]
fn previous_winner_is_reset_only_when_displaced_by_higher_priority() {
    init_tracing();
    const LEN: usize = 3;
    for first in 0..(1u32 << LEN) {
        for second in 0..(1u32 << LEN) {
            let switches: Vec<_> = (0..LEN).map(|_| Rc::new(Cell::new(Waiting))).collect();
            let (children, calls): (Vec<_>, Vec<_>) =
                switches.iter().map(|switch| probe(switched(switch))).unzip();
            let mut node = FixedPriorityNode::new(children);

            for (switch, state) in switches.iter().zip(mask_states(first, LEN)) {
                switch.set(state);
            }
            node.update().unwrap();
            let before = node.winner_index();
            calls.iter().for_each(|calls| calls.clear());

            for (switch, state) in switches.iter().zip(mask_states(second, LEN)) {
                switch.set(state);
            }
            node.update().unwrap();
            let after = node.winner_index();

            for (index, calls) in calls.iter().enumerate() {
                let preempted = matches!(
                    (after, before),
                    (Some(new), Some(old)) if new < old && old == index
                );
                assert_eq!(
                    calls.resets.get(),
                    u32::from(preempted),
                    "{first:b} -> {second:b}, child {index}"
                );
            }
        }
    }
}

#[test]
fn concurrent_node_ticks_every_member_every_update() {
    init_tracing();
    const LEN: usize = 3;
    let switches: Vec<_> = (0..LEN).map(|_| Rc::new(Cell::new(Waiting))).collect();
    let (children, calls): (Vec<_>, Vec<_>) =
        switches.iter().map(|switch| probe(switched(switch))).unzip();
    let mut node = ConcurrentNode::new(arbitration::any_active, children);

    for (tick, mask) in (0..(1u32 << LEN)).enumerate() {
        for (switch, state) in switches.iter().zip(mask_states(mask, LEN)) {
            switch.set(state);
        }
        node.update().unwrap();

        assert_eq!(node.state(), BehaviorValue::from_active(mask != 0));
        for calls in &calls {
            assert_eq!(calls.updates.get(), tick as u32 + 1);
        }
    }

    node.dispose().unwrap();
    assert!(calls.iter().all(|calls| calls.disposes.get() == 1));
    assert!(calls.iter().all(|calls| calls.resets.get() == 0));
}

#[test]
fn nested_priority_inside_concurrent() {
    init_tracing();
    let idle = Rc::new(Cell::new(Waiting));
    let busy = Rc::new(Cell::new(Active));
    let lookout = Rc::new(Cell::new(Waiting));

    let mut root = builder::concurrent(
        arbitration::first_or_default,
        vec![
            builder::fixed_priority(vec![switched(&idle), switched(&busy)]),
            switched(&lookout),
        ],
    );

    root.update().unwrap();
    assert_eq!(root.state(), Active);
    assert_eq!(root.value(), Some(Active));

    busy.set(Waiting);
    lookout.set(Active);
    root.update().unwrap();
    assert_eq!(root.state(), Waiting);
}
