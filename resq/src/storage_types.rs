use std::fmt;

/// Result of a ranged list read.
///
/// A count of one yields [`ListSlice::Single`] (the item or `None`); any
/// other count yields [`ListSlice::Many`], which may be shorter than asked.
#[derive(Debug, Clone, PartialEq)]
pub enum ListSlice<T> {
    Single(Option<T>),
    Many(Vec<T>),
}

impl<T> ListSlice<T> {
    pub fn single(self) -> Option<T> {
        match self {
            Self::Single(item) => item,
            Self::Many(items) => items.into_iter().next(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(item) => item.into_iter().collect(),
            Self::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(item) => usize::from(item.is_some()),
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Liveness of a registered worker, derived from its payload key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Working,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Working => write!(f, "working"),
        }
    }
}

/// Type-dispatched view of an arbitrary key for diagnostic UIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    /// Missing key, or a type the admin views do not read.
    Empty,
    List(Vec<String>),
    Set(Vec<String>),
    String(String),
    SortedSet(Vec<String>),
}
