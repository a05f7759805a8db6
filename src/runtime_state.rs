use super::*;

/// Kind of user interaction simulated by a [`Document`] user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    Input,
    Change,
    Blur,
    Submit,
    Reset,
}

impl UiEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Change => "change",
            Self::Blur => "blur",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for UiEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user interaction that fired on `target`. Returned by document user actions
/// so callers can route it to a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiEvent {
    pub kind: UiEventKind,
    pub target: NodeId,
}

impl UiEvent {
    pub fn new(kind: UiEventKind, target: NodeId) -> Self {
        Self { kind, target }
    }
}

/// A notification delivered to listeners registered with
/// [`Document::add_event_listener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: NodeId,
}

pub(crate) type Listener = Box<dyn FnMut(&DomEvent)>;

#[derive(Default)]
pub(crate) struct ListenerStore {
    pub(crate) map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: String, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(listener);
    }

    pub(crate) fn take(&mut self, node_id: NodeId, event: &str) -> Vec<Listener> {
        self.map
            .get_mut(&node_id)
            .and_then(|events| events.remove(event))
            .unwrap_or_default()
    }

    // Listeners added while dispatching stay after the restored ones.
    pub(crate) fn restore(&mut self, node_id: NodeId, event: &str, mut listeners: Vec<Listener>) {
        if listeners.is_empty() {
            return;
        }
        let slot = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default();
        listeners.append(slot);
        *slot = listeners;
    }

    pub(crate) fn remove_all(&mut self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get_mut(&node_id)
            .and_then(|events| events.remove(event))
            .map(|removed| removed.len())
            .unwrap_or(0)
    }

    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (node, events) in &self.map {
            let counts = events
                .iter()
                .map(|(event, listeners)| (event.as_str(), listeners.len()))
                .collect::<Vec<_>>();
            map.entry(node, &counts);
        }
        map.finish()
    }
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) actions: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            actions: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

impl TraceState {
    pub(crate) fn push(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        if self.to_stderr {
            eprintln!("{line}");
        }
        if self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RngState {
    pub(crate) state: u64,
}

impl Default for RngState {
    fn default() -> Self {
        Self {
            state: 0xA5A5_A5A5_A5A5_A5A5,
        }
    }
}

impl RngState {
    pub(crate) fn seed(&mut self, seed: u64) {
        self.state = if seed == 0 {
            0xA5A5_A5A5_A5A5_A5A5
        } else {
            seed
        };
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}
