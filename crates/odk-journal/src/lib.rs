//! odk-journal
//!
//! Append-only journal of applied quantity changes, one JSON object per line.
//!
//! Lines are canonical: flat objects with sorted keys, compact. With the
//! hash chain enabled each event carries `hash_prev` (the previous event's
//! `hash_self`) and `hash_self`, a SHA-256 over every other field. Once a
//! journal is chained every later line must be too, so an edited, dropped,
//! reordered or un-hashed line is reported by [`verify_chain`].

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use odk_basket::ChangeRecord;
use odk_quantity::{CommitSource, Qty};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEvent {
    pub seq: u64,
    pub session_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub code: String,
    pub previous: Qty,
    pub value: Qty,
    pub source: CommitSource,
    pub corrected: bool,
    pub hash_prev: Option<String>,
    pub hash_self: Option<String>,
}

pub struct JournalWriter {
    path: PathBuf,
    session_id: Uuid,
    hash_chain: bool,
    last_hash: Option<String>,
    /// Sequence number of the next event; continues across sessions.
    seq: u64,
}

impl JournalWriter {
    /// Open a journal for a new session. If the file already has events the
    /// sequence and hash chain continue from its last line.
    pub fn open(path: impl AsRef<Path>, session_id: Uuid, hash_chain: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create_dir_all {:?}", parent))?;
            }
        }

        let (seq, last_hash) = match fs::read_to_string(&path) {
            Ok(content) => match last_event(&content)? {
                Some(ev) => (ev.seq + 1, ev.hash_self),
                None => (0, None),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (0, None),
            Err(e) => return Err(e).with_context(|| format!("read journal {:?}", path)),
        };

        Ok(Self {
            path,
            session_id,
            hash_chain,
            last_hash,
            seq,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn last_hash(&self) -> Option<&str> {
        self.last_hash.as_deref()
    }

    pub fn append(&mut self, change: &ChangeRecord) -> Result<JournalEvent> {
        let mut ev = JournalEvent {
            seq: self.seq,
            session_id: self.session_id,
            ts_utc: Utc::now(),
            code: change.code.clone(),
            previous: change.previous,
            value: change.value,
            source: change.source,
            corrected: change.corrected,
            hash_prev: None,
            hash_self: None,
        };

        if self.hash_chain {
            ev.hash_prev = self.last_hash.clone();
            let self_hash = ev.content_hash()?;
            ev.hash_self = Some(self_hash.clone());
            self.last_hash = Some(self_hash);
        }

        let line = ev.to_line()?;
        append_line(&self.path, &line)?;
        self.seq += 1;

        Ok(ev)
    }

    pub fn append_all(&mut self, changes: &[ChangeRecord]) -> Result<Vec<JournalEvent>> {
        changes.iter().map(|c| self.append(c)).collect()
    }
}

fn last_event(content: &str) -> Result<Option<JournalEvent>> {
    match content.lines().rev().map(str::trim).find(|l| !l.is_empty()) {
        None => Ok(None),
        Some(line) => {
            let ev = serde_json::from_str(line).context("parse last journal line")?;
            Ok(Some(ev))
        }
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open journal {:?}", path))?;
    f.write_all(line.as_bytes())
        .context("write journal line failed")?;
    f.write_all(b"\n").context("write newline failed")?;
    Ok(())
}

impl JournalEvent {
    /// Canonical fields, keyed in sorted order. `hash_self` is excluded when
    /// `with_self_hash` is false.
    fn fields(&self, with_self_hash: bool) -> Result<BTreeMap<String, Value>> {
        let Value::Object(map) = serde_json::to_value(self).context("serialize journal event")?
        else {
            anyhow::bail!("journal event did not serialize to an object");
        };
        Ok(map
            .into_iter()
            .filter(|(k, _)| with_self_hash || k != "hash_self")
            .collect())
    }

    /// SHA-256 (hex) over every field except `hash_self`.
    pub fn content_hash(&self) -> Result<String> {
        let body = serde_json::to_vec(&self.fields(false)?).context("encode hash body")?;
        Ok(hex::encode(Sha256::digest(&body)))
    }

    /// The JSONL line for this event, without the trailing newline.
    pub fn to_line(&self) -> Result<String> {
        serde_json::to_string(&self.fields(true)?).context("encode journal line")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Valid { lines: usize },
    /// `line` is 1-based.
    Broken { line: usize, reason: String },
}

impl VerifyResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyResult::Valid { .. })
    }
}

pub fn verify_chain(path: impl AsRef<Path>) -> Result<VerifyResult> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("read journal {:?}", path.as_ref()))?;
    verify_chain_str(&content)
}

/// Same as [`verify_chain`] over in-memory JSONL content.
pub fn verify_chain_str(content: &str) -> Result<VerifyResult> {
    let mut chain = ChainState::default();

    for (idx, raw) in content.lines().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let ev: JournalEvent = serde_json::from_str(raw)
            .with_context(|| format!("parse journal event at line {}", idx + 1))?;

        if let Err(reason) = chain.accept(&ev)? {
            return Ok(VerifyResult::Broken {
                line: idx + 1,
                reason,
            });
        }
    }

    Ok(VerifyResult::Valid { lines: chain.lines })
}

/// Running state of a verification pass.
#[derive(Default)]
struct ChainState {
    lines: usize,
    next_seq: Option<u64>,
    /// `hash_self` of the last accepted line.
    tip: Option<String>,
    /// Set once any line carries a hash; from then on every line must.
    chained: bool,
}

impl ChainState {
    /// Outer `Err` is an I/O-level failure; inner `Err` is the break reason.
    fn accept(&mut self, ev: &JournalEvent) -> Result<std::result::Result<(), String>> {
        if let Some(expected) = self.next_seq {
            if ev.seq != expected {
                return Ok(Err(format!("seq gap: expected {expected}, got {}", ev.seq)));
            }
        }
        if ev.hash_prev != self.tip {
            return Ok(Err(format!(
                "hash_prev mismatch: expected {:?}, got {:?}",
                self.tip, ev.hash_prev
            )));
        }

        match (&ev.hash_self, self.chained) {
            (Some(claimed), _) => {
                let actual = ev.content_hash()?;
                if *claimed != actual {
                    return Ok(Err(format!(
                        "hash_self mismatch: claimed {claimed}, recomputed {actual}"
                    )));
                }
                self.chained = true;
            }
            (None, true) => return Ok(Err("hash_self missing in chained journal".to_string())),
            (None, false) => {}
        }

        self.lines += 1;
        self.next_seq = Some(ev.seq + 1);
        self.tip = ev.hash_self.clone();
        Ok(Ok(()))
    }
}
