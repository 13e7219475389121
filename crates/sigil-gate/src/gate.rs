//! Gate state, verification, and the accepted-signal log.

use std::path::PathBuf;
use std::sync::RwLock;

use sigil_core::base::{ELEMENT_SIZE, Element};
use sigil_core::schema::signal::{AcceptedSignal, SignalProof};
use sigil_core::scope::Scope;
use sigil_proofs::SignalBackend;
use sled::Transactional;
use sled::transaction::{ConflictableTransactionError, TransactionError};

use crate::error::GateError;
use crate::roots::{DEFAULT_ROOT_WINDOW, RootWindow};

const NULLIFIER_TREE: &[u8] = b"nullifiers";
const SIGNAL_TREE: &[u8] = b"signals";
const META_TREE: &[u8] = b"meta";
const NEXT_SEQ_KEY: &[u8] = b"next_seq";
const ROOTS_KEY: &[u8] = b"roots";

/// Gate configuration.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Directory for the gate's database.
    pub path: PathBuf,
    /// Number of recognized roots (current + previous `root_window - 1`).
    pub root_window: usize,
    /// Capacity of the live accepted-signal broadcast channel.
    pub live_capacity: usize,
}

impl GateConfig {
    /// Configuration with the default root window.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root_window: DEFAULT_ROOT_WINDOW,
            live_capacity: 128,
        }
    }
}

/// The accept decision, carrying the signal's public digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// Position in the accepted-signal log.
    pub seq: u64,
    /// The accepted signal's public digest.
    pub signal_digest: Element,
}

enum Abort {
    Duplicate,
    Codec(String),
    CorruptCounter,
}

/// The verification gate.
///
/// Owns the seen-nullifier set and the accepted-signal log (both on
/// `sled`, surviving restart) plus the recognized-root window (also
/// persisted, so a redeploy keeps accepting in-flight proofs). Safe to
/// share across threads; concurrent verifies for different nullifiers
/// proceed independently, while two carrying the same nullifier resolve
/// so that exactly one is accepted.
pub struct Gate<B> {
    db: sled::Db,
    nullifiers: sled::Tree,
    signals: sled::Tree,
    meta: sled::Tree,
    roots: RwLock<RootWindow>,
    backend: B,
    live: tokio::sync::broadcast::Sender<AcceptedSignal>,
}

impl<B: SignalBackend> Gate<B> {
    /// Open (or create) a gate at the configured path.
    ///
    /// # Errors
    /// Returns a [`GateError`] if the database cannot be opened or the
    /// persisted root window fails to decode.
    pub fn open(config: &GateConfig, backend: B) -> Result<Self, GateError> {
        let db = sled::open(&config.path)?;
        let nullifiers = db.open_tree(NULLIFIER_TREE)?;
        let signals = db.open_tree(SIGNAL_TREE)?;
        let meta = db.open_tree(META_TREE)?;

        let mut window = RootWindow::new(config.root_window);
        if let Some(bytes) = meta.get(ROOTS_KEY)? {
            let stored: Vec<Element> = serde_json::from_slice(&bytes)?;
            // Stored newest-first; replay oldest-first to rebuild order.
            for root in stored.into_iter().rev() {
                window.track(root);
            }
        }

        let (live, _) = tokio::sync::broadcast::channel(config.live_capacity.max(1));
        Ok(Self {
            db,
            nullifiers,
            signals,
            meta,
            roots: RwLock::new(window),
            backend,
            live,
        })
    }

    /// Recognize a root, evicting the oldest past the window.
    ///
    /// # Errors
    /// Returns a [`GateError`] if persisting the window fails.
    pub fn track_root(&self, root: Element) -> Result<(), GateError> {
        let snapshot = {
            let mut window = self.roots.write().map_err(|_| GateError::LockPoisoned)?;
            window.track(root);
            window.roots().collect::<Vec<_>>()
        };
        self.meta.insert(ROOTS_KEY, serde_json::to_vec(&snapshot)?)?;
        self.db.flush()?;
        tracing::debug!(%root, "tracked group root");
        Ok(())
    }

    /// `true` if the root is inside the recognized window.
    ///
    /// # Errors
    /// Returns [`GateError::LockPoisoned`] if the window lock is poisoned.
    pub fn recognizes(&self, root: Element) -> Result<bool, GateError> {
        Ok(self
            .roots
            .read()
            .map_err(|_| GateError::LockPoisoned)?
            .recognizes(root))
    }

    /// The most recently tracked root.
    ///
    /// # Errors
    /// Returns [`GateError::LockPoisoned`] if the window lock is poisoned.
    pub fn latest_root(&self) -> Result<Option<Element>, GateError> {
        Ok(self
            .roots
            .read()
            .map_err(|_| GateError::LockPoisoned)?
            .latest())
    }

    /// Verify a submission and, on success, record its nullifier and
    /// append it to the accepted-signal log.
    ///
    /// The duplicate check and the insert happen in one serializable
    /// transaction with the log append: of any number of concurrent
    /// submissions carrying the same nullifier, exactly one is accepted
    /// and the rest observe [`GateError::DuplicateSignal`] with nothing
    /// written.
    ///
    /// # Errors
    /// - [`GateError::StaleRoot`] if the proof's root is outside the window.
    /// - [`GateError::InvalidProof`] if the backend rejects the proof, or
    ///   the proof was built for a different scope than the submission
    ///   claims.
    /// - [`GateError::DuplicateSignal`] if the nullifier was already
    ///   accepted in this scope.
    pub fn verify(&self, submission: &SignalProof, scope: Scope) -> Result<Accepted, GateError> {
        if !self.recognizes(submission.public.root)? {
            tracing::debug!(root = %submission.public.root, "rejecting stale root");
            return Err(GateError::StaleRoot);
        }

        // A proof is bound to the scope its nullifier was derived under;
        // replaying it into another scope would mint a fresh nullifier key.
        if submission.public.scope != scope.element() {
            tracing::debug!(claimed = %scope.element(), bound = %submission.public.scope, "rejecting scope mismatch");
            return Err(GateError::InvalidProof);
        }

        let valid = self
            .backend
            .verify(&submission.proof, &submission.public)
            .map_err(|_| GateError::InvalidProof)?;
        if !valid {
            return Err(GateError::InvalidProof);
        }

        let key = nullifier_key(scope, submission.public.nullifier_hash);
        let template = AcceptedSignal {
            seq: 0,
            scope: scope.element(),
            nullifier_hash: submission.public.nullifier_hash,
            signal_digest: submission.public.signal_digest,
        };

        let result = (&self.nullifiers, &self.signals, &self.meta).transaction(
            |(nullifiers, signals, meta)| {
                if nullifiers.get(&key[..])?.is_some() {
                    return Err(ConflictableTransactionError::Abort(Abort::Duplicate));
                }
                nullifiers.insert(&key[..], &[1_u8][..])?;

                let seq = match meta.get(NEXT_SEQ_KEY)? {
                    Some(bytes) => decode_seq(&bytes).ok_or(
                        ConflictableTransactionError::Abort(Abort::CorruptCounter),
                    )?,
                    None => 0,
                };
                meta.insert(NEXT_SEQ_KEY, &seq.saturating_add(1).to_be_bytes())?;

                let mut record = template.clone();
                record.seq = seq;
                let value = serde_json::to_vec(&record).map_err(|e| {
                    ConflictableTransactionError::Abort(Abort::Codec(e.to_string()))
                })?;
                signals.insert(&seq.to_be_bytes()[..], value)?;
                Ok(record)
            },
        );

        match result {
            Ok(record) => {
                self.db.flush()?;
                tracing::info!(
                    seq = record.seq,
                    nullifier = %record.nullifier_hash,
                    "accepted signal"
                );
                let accepted = Accepted {
                    seq: record.seq,
                    signal_digest: record.signal_digest,
                };
                let _ = self.live.send(record);
                Ok(accepted)
            }
            Err(TransactionError::Abort(Abort::Duplicate)) => Err(GateError::DuplicateSignal),
            Err(TransactionError::Abort(Abort::Codec(message))) => Err(GateError::Codec(message)),
            Err(TransactionError::Abort(Abort::CorruptCounter)) => Err(GateError::Codec(
                "accepted-signal sequence counter is corrupt".to_owned(),
            )),
            Err(TransactionError::Storage(e)) => Err(GateError::Storage(e)),
        }
    }

    /// Replay the accepted-signal log from an arbitrary sequence number.
    pub fn signals_from(
        &self,
        from_seq: u64,
    ) -> impl Iterator<Item = Result<AcceptedSignal, GateError>> + '_ {
        self.signals.range(from_seq.to_be_bytes()..).map(|entry| {
            let (_key, value) = entry?;
            Ok(serde_json::from_slice(&value)?)
        })
    }

    /// The next sequence number the log will assign.
    ///
    /// # Errors
    /// Returns a [`GateError`] on storage failure or a corrupt counter.
    pub fn next_seq(&self) -> Result<u64, GateError> {
        match self.meta.get(NEXT_SEQ_KEY)? {
            Some(bytes) => decode_seq(&bytes).ok_or(GateError::Codec(
                "accepted-signal sequence counter is corrupt".to_owned(),
            )),
            None => Ok(0),
        }
    }

    /// Subscribe to signals accepted after this call.
    ///
    /// For a complete, restartable view, combine with
    /// [`Gate::signals_from`].
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<AcceptedSignal> {
        self.live.subscribe()
    }
}

fn nullifier_key(scope: Scope, nullifier_hash: Element) -> [u8; ELEMENT_SIZE * 2] {
    let mut key = [0_u8; ELEMENT_SIZE * 2];
    let (left, right) = key.split_at_mut(ELEMENT_SIZE);
    left.copy_from_slice(&scope.element().to_bytes());
    right.copy_from_slice(&nullifier_hash.to_bytes());
    key
}

fn decode_seq(bytes: &[u8]) -> Option<u64> {
    bytes.try_into().ok().map(u64::from_be_bytes)
}
