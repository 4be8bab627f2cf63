use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use super::{Backend, KeyType};
use crate::ResqError;

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug, Clone)]
enum Entry {
    String(String),
    List(VecDeque<String>),
    Set(BTreeSet<String>),
    /// Kept sorted by (score, member).
    ZSet(Vec<(f64, String)>),
}

/// In-process [`Backend`] with Redis semantics for the commands the stores
/// use. Empty lists and sets are dropped, like Redis does.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn wrong_type() -> ResqError {
    ResqError::Backend(WRONG_TYPE.to_string())
}

/// Resolves a possibly negative index against `len`.
fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let index = if index < 0 { len + index } else { index };
    if (0..len).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Resolves an inclusive Redis range to a half-open one.
fn resolve_range(start: isize, stop: isize, len: usize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize + 1))
    }
}

fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.split_first(), text.split_first()) {
        (None, None) => true,
        (Some((b'*', rest)), _) => {
            glob_match(rest, text)
                || text
                    .split_first()
                    .is_some_and(|(_, text_rest)| glob_match(pattern, text_rest))
        }
        (Some((b'?', rest)), Some((_, text_rest))) => glob_match(rest, text_rest),
        (Some((p, rest)), Some((t, text_rest))) => p == t && glob_match(rest, text_rest),
        _ => false,
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sadd(&self, key: &str, member: &str) -> Result<(), ResqError> {
        let mut entries = self.entries.lock();
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()))
        {
            Entry::Set(set) => {
                set.insert(member.to_string());
                Ok(())
            }
            _ => Err(wrong_type()),
        }
    }

    async fn srem(&self, key: &str, member: &str) -> Result<(), ResqError> {
        let mut entries = self.entries.lock();
        let now_empty = match entries.get_mut(key) {
            Some(Entry::Set(set)) => {
                set.remove(member);
                set.is_empty()
            }
            Some(_) => return Err(wrong_type()),
            None => false,
        };
        if now_empty {
            entries.remove(key);
        }
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(wrong_type()),
            None => Ok(vec![]),
        }
    }

    async fn sismember(&self, key: &str, member: &str) -> Result<bool, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::Set(set)) => Ok(set.contains(member)),
            Some(_) => Err(wrong_type()),
            None => Ok(false),
        }
    }

    async fn scard(&self, key: &str) -> Result<usize, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::Set(set)) => Ok(set.len()),
            Some(_) => Err(wrong_type()),
            None => Ok(0),
        }
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<usize, ResqError> {
        let mut entries = self.entries.lock();
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(VecDeque::new()))
        {
            Entry::List(list) => {
                list.push_back(value.to_string());
                Ok(list.len())
            }
            _ => Err(wrong_type()),
        }
    }

    async fn lpop(&self, key: &str) -> Result<Option<String>, ResqError> {
        let mut entries = self.entries.lock();
        let (value, now_empty) = match entries.get_mut(key) {
            Some(Entry::List(list)) => (list.pop_front(), list.is_empty()),
            Some(_) => return Err(wrong_type()),
            None => (None, false),
        };
        if now_empty {
            entries.remove(key);
        }
        Ok(value)
    }

    async fn llen(&self, key: &str) -> Result<usize, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::List(list)) => Ok(list.len()),
            Some(_) => Err(wrong_type()),
            None => Ok(0),
        }
    }

    async fn lindex(&self, key: &str, index: isize) -> Result<Option<String>, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::List(list)) => {
                Ok(resolve_index(index, list.len()).and_then(|i| list.get(i).cloned()))
            }
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::List(list)) => Ok(match resolve_range(start, stop, list.len()) {
                Some((from, to)) => list.range(from..to).cloned().collect(),
                None => vec![],
            }),
            Some(_) => Err(wrong_type()),
            None => Ok(vec![]),
        }
    }

    async fn lrem(&self, key: &str, count: isize, value: &str) -> Result<usize, ResqError> {
        let mut entries = self.entries.lock();
        let (removed, now_empty) = match entries.get_mut(key) {
            Some(Entry::List(list)) => {
                let limit = if count == 0 {
                    usize::MAX
                } else {
                    count.unsigned_abs()
                };
                let mut removed = 0;
                if count >= 0 {
                    let mut i = 0;
                    while i < list.len() && removed < limit {
                        if list.get(i).is_some_and(|item| item == value) {
                            list.remove(i);
                            removed += 1;
                        } else {
                            i += 1;
                        }
                    }
                } else {
                    let mut i = list.len();
                    while i > 0 && removed < limit {
                        i -= 1;
                        if list.get(i).is_some_and(|item| item == value) {
                            list.remove(i);
                            removed += 1;
                        }
                    }
                }
                (removed, list.is_empty())
            }
            Some(_) => return Err(wrong_type()),
            None => (0, false),
        };
        if now_empty {
            entries.remove(key);
        }
        Ok(removed)
    }

    async fn lset(&self, key: &str, index: isize, value: &str) -> Result<(), ResqError> {
        match self.entries.lock().get_mut(key) {
            Some(Entry::List(list)) => {
                let slot = resolve_index(index, list.len())
                    .and_then(|i| list.get_mut(i))
                    .ok_or_else(|| ResqError::Backend("ERR index out of range".to_string()))?;
                *slot = value.to_string();
                Ok(())
            }
            Some(_) => Err(wrong_type()),
            None => Err(ResqError::Backend("ERR no such key".to_string())),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ResqError> {
        self.entries
            .lock()
            .insert(key.to_string(), Entry::String(value.to_string()));
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, ResqError> {
        let entries = self.entries.lock();
        Ok(keys
            .iter()
            .map(|key| match entries.get(key) {
                Some(Entry::String(value)) => Some(value.clone()),
                _ => None,
            })
            .collect())
    }

    async fn incr_by(&self, key: &str, by: i64) -> Result<i64, ResqError> {
        let mut entries = self.entries.lock();
        let current = match entries.get(key) {
            Some(Entry::String(value)) => value.parse::<i64>().map_err(|_| {
                ResqError::Backend("ERR value is not an integer or out of range".to_string())
            })?,
            Some(_) => return Err(wrong_type()),
            None => 0,
        };
        let next = current.checked_add(by).ok_or_else(|| {
            ResqError::Backend("ERR increment or decrement would overflow".to_string())
        })?;
        entries.insert(key.to_string(), Entry::String(next.to_string()));
        Ok(next)
    }

    async fn exists(&self, key: &str) -> Result<bool, ResqError> {
        Ok(self.entries.lock().contains_key(key))
    }

    async fn del(&self, key: &str) -> Result<(), ResqError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn strlen(&self, key: &str) -> Result<usize, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::String(value)) => Ok(value.len()),
            Some(_) => Err(wrong_type()),
            None => Ok(0),
        }
    }

    async fn key_type(&self, key: &str) -> Result<KeyType, ResqError> {
        Ok(match self.entries.lock().get(key) {
            Some(Entry::String(_)) => KeyType::String,
            Some(Entry::List(_)) => KeyType::List,
            Some(Entry::Set(_)) => KeyType::Set,
            Some(Entry::ZSet(_)) => KeyType::ZSet,
            None => KeyType::None,
        })
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), ResqError> {
        let mut entries = self.entries.lock();
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::ZSet(Vec::new()))
        {
            Entry::ZSet(zset) => {
                zset.retain(|(_, existing)| existing != member);
                zset.push((score, member.to_string()));
                zset.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
                Ok(())
            }
            _ => Err(wrong_type()),
        }
    }

    async fn zcard(&self, key: &str) -> Result<usize, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::ZSet(zset)) => Ok(zset.len()),
            Some(_) => Err(wrong_type()),
            None => Ok(0),
        }
    }

    async fn zrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, ResqError> {
        match self.entries.lock().get(key) {
            Some(Entry::ZSet(zset)) => Ok(match resolve_range(start, stop, zset.len()) {
                Some((from, to)) => zset
                    .get(from..to)
                    .unwrap_or_default()
                    .iter()
                    .map(|(_, member)| member.clone())
                    .collect(),
                None => vec![],
            }),
            Some(_) => Err(wrong_type()),
            None => Ok(vec![]),
        }
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, ResqError> {
        Ok(self
            .entries
            .lock()
            .keys()
            .filter(|key| glob_match(pattern.as_bytes(), key.as_bytes()))
            .cloned()
            .collect())
    }
}
