//! Open and closed sets of a graph search.
//!
//! The frontier stores `(NodeId, revision)` entries rather than nodes. A node
//! re-parented while open is pushed again under its new revision; the older
//! entry stays in the queue and is recognised as stale when it surfaces.
use crate::node::NodeId;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Order in which the frontier releases entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    /// Most recently pushed first (depth-first).
    Lifo,
    /// Oldest first (breadth-first).
    Fifo,
    /// Smallest `f_cost` first.
    LowestCost,
    /// Largest `f_cost` first.
    HighestCost,
}

/// A queued reference to a node.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub id: NodeId,
    pub revision: u32,
    key: f64,
    seq: u64,
}

// `BinaryHeap` is a max-heap: the entry with the smallest key, and among equal
// keys the earliest pushed, must compare greatest.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

#[derive(Debug)]
enum Queue {
    Stack(Vec<Entry>),
    Fifo(VecDeque<Entry>),
    Heap(BinaryHeap<Entry>),
}

/// Unexpanded nodes plus an index from state to the node holding it.
#[derive(Debug)]
pub struct Frontier<S> {
    discipline: Discipline,
    queue: Queue,
    open: HashMap<S, NodeId>,
    next_seq: u64,
}

impl<S: Eq + Hash> Frontier<S> {
    pub fn new(discipline: Discipline) -> Self {
        let queue = match discipline {
            Discipline::Lifo => Queue::Stack(Vec::new()),
            Discipline::Fifo => Queue::Fifo(VecDeque::new()),
            Discipline::LowestCost | Discipline::HighestCost => Queue::Heap(BinaryHeap::new()),
        };
        Frontier {
            discipline,
            queue,
            open: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Opens `state`, held by node `id`, and queues it.
    pub fn insert(&mut self, state: S, id: NodeId, f_cost: f64) {
        self.open.insert(state, id);
        self.requeue(id, 0, f_cost);
    }

    /// Queues another entry for an already-open node after its cost changed.
    pub fn requeue(&mut self, id: NodeId, revision: u32, f_cost: f64) {
        let key = match self.discipline {
            Discipline::HighestCost => -f_cost,
            _ => f_cost,
        };
        let entry = Entry {
            id,
            revision,
            key,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        match &mut self.queue {
            Queue::Stack(stack) => stack.push(entry),
            Queue::Fifo(fifo) => fifo.push_back(entry),
            Queue::Heap(heap) => heap.push(entry),
        }
    }

    /// Next entry per the discipline. May be stale; the caller checks.
    pub fn pop(&mut self) -> Option<Entry> {
        match &mut self.queue {
            Queue::Stack(stack) => stack.pop(),
            Queue::Fifo(fifo) => fifo.pop_front(),
            Queue::Heap(heap) => heap.pop(),
        }
    }

    /// Node currently holding `state` in the frontier, if any.
    pub fn open_node(&self, state: &S) -> Option<NodeId> {
        self.open.get(state).copied()
    }

    /// Drops `state` from the open index once its node is expanded.
    pub fn close(&mut self, state: &S) -> Option<NodeId> {
        self.open.remove(state)
    }

    /// Queued entries, stale ones included.
    pub fn len(&self) -> usize {
        match &self.queue {
            Queue::Stack(stack) => stack.len(),
            Queue::Fifo(fifo) => fifo.len(),
            Queue::Heap(heap) => heap.len(),
        }
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }
}

/// States that have been fully expanded.
#[derive(Debug)]
pub struct VisitedSet<S> {
    closed: HashSet<S>,
}

impl<S: Eq + Hash> VisitedSet<S> {
    pub fn new() -> Self {
        VisitedSet {
            closed: HashSet::new(),
        }
    }

    /// Returns false if `state` was already closed.
    pub fn insert(&mut self, state: S) -> bool {
        self.closed.insert(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.closed.contains(state)
    }
}
