//! Connections: the bidirectional relationship between two users
//!
//! A connection is keyed by the derived pair id from [`crate::pairing`], so
//! the same record is found no matter which participant asks. The store here
//! is the in-memory registry services share in-process; durable persistence
//! sits behind it elsewhere.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::id::{ConnectionId, UserId};

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Requested, awaiting the other side
    Pending,
    /// Both sides agreed
    Accepted,
    /// The other side said no
    Declined,
    /// One side blocked the relationship
    Blocked,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Pending => write!(f, "pending"),
            ConnectionStatus::Accepted => write!(f, "accepted"),
            ConnectionStatus::Declined => write!(f, "declined"),
            ConnectionStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// A relationship record between exactly two users
///
/// `participants` is stored in canonical (byte) order, the same order the
/// pair derivation uses, so the record is identical whichever side created
/// it. `requested_by` remembers who initiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub participants: [UserId; 2],
    pub requested_by: UserId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    /// Create a pending connection request from `a` to `b`.
    ///
    /// The id is derived, never generated; self-connections are rejected
    /// here rather than in the derivation (which is total by design).
    pub fn request(a: &UserId, b: &UserId) -> Result<Self> {
        if a == b {
            return Err(CoreError::self_connection(a));
        }

        let (first, second) = if a.uuid() <= b.uuid() {
            (*a, *b)
        } else {
            (*b, *a)
        };
        let now = Utc::now();

        Ok(Self {
            id: ConnectionId::between(a, b),
            participants: [first, second],
            requested_by: *a,
            status: ConnectionStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether `user` is one of the two participants
    pub fn involves(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    /// The participant that isn't `user`, if `user` is part of this
    /// connection at all
    pub fn other_participant(&self, user: &UserId) -> Option<&UserId> {
        match &self.participants {
            [a, b] if a == user => Some(b),
            [a, b] if b == user => Some(a),
            _ => None,
        }
    }

    /// Accept a pending request
    pub fn accept(&mut self) -> Result<()> {
        self.transition(ConnectionStatus::Accepted)
    }

    /// Decline a pending request
    pub fn decline(&mut self) -> Result<()> {
        self.transition(ConnectionStatus::Declined)
    }

    /// Block the relationship. Allowed from any state.
    pub fn block(&mut self) {
        self.status = ConnectionStatus::Blocked;
        self.updated_at = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Accepted
    }

    fn transition(&mut self, next: ConnectionStatus) -> Result<()> {
        if self.status != ConnectionStatus::Pending {
            return Err(CoreError::invalid_transition(self.status, next));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory connection registry keyed by derived pair id
///
/// Plays both roles the derivation exists for: creating a relationship
/// record under its canonical key, and finding it again from either
/// participant order without any index.
pub struct ConnectionStore {
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a pending connection from `a` to `b`.
    ///
    /// A re-request from either side lands on the same derived key, so
    /// duplicates are caught structurally rather than by scanning.
    pub fn request(&self, a: &UserId, b: &UserId) -> Result<Connection> {
        let connection = Connection::request(a, b)?;

        match self.connections.entry(connection.id) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    "duplicate connection request from {} to {} (existing status: {})",
                    a,
                    b,
                    existing.get().status
                );
                Err(CoreError::AlreadyConnected {
                    id: connection.id.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                tracing::debug!("connection {} requested by {}", connection.id, a);
                slot.insert(connection.clone());
                Ok(connection)
            }
        }
    }

    /// Look up the connection between two users, in either argument order
    pub fn between(&self, a: &UserId, b: &UserId) -> Option<Connection> {
        self.connections
            .get(&ConnectionId::between(a, b))
            .map(|entry| entry.clone())
    }

    /// Look up by key directly
    pub fn get(&self, id: &ConnectionId) -> Option<Connection> {
        self.connections.get(id).map(|entry| entry.clone())
    }

    /// Accept the pending connection between two users
    pub fn accept(&self, a: &UserId, b: &UserId) -> Result<Connection> {
        self.with_connection(a, b, Connection::accept)
    }

    /// Decline the pending connection between two users
    pub fn decline(&self, a: &UserId, b: &UserId) -> Result<Connection> {
        self.with_connection(a, b, Connection::decline)
    }

    /// Block the connection between two users, whatever its state
    pub fn block(&self, a: &UserId, b: &UserId) -> Result<Connection> {
        self.with_connection(a, b, |connection| {
            connection.block();
            Ok(())
        })
    }

    /// Drop the connection between two users
    pub fn remove(&self, a: &UserId, b: &UserId) -> Result<Connection> {
        let id = ConnectionId::between(a, b);
        match self.connections.remove(&id) {
            Some((_, connection)) => {
                tracing::debug!("connection {} removed", id);
                Ok(connection)
            }
            None => Err(CoreError::ConnectionNotFound {
                a: a.to_string(),
                b: b.to_string(),
            }),
        }
    }

    /// All connections involving `user`
    pub fn connections_of(&self, user: &UserId) -> Vec<Connection> {
        self.connections
            .iter()
            .filter(|entry| entry.involves(user))
            .map(|entry| entry.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    fn with_connection<F>(&self, a: &UserId, b: &UserId, apply: F) -> Result<Connection>
    where
        F: FnOnce(&mut Connection) -> Result<()>,
    {
        let id = ConnectionId::between(a, b);
        let Some(mut entry) = self.connections.get_mut(&id) else {
            return Err(CoreError::ConnectionNotFound {
                a: a.to_string(),
                b: b.to_string(),
            });
        };
        apply(&mut entry)?;
        Ok(entry.clone())
    }
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}
