//! Rooms and participants.
//!
//! There is no transport: a room holds a snapshot of the drawing and the
//! user list, and joining a room schedules one simulated participant who
//! arrives after a fixed delay. The delay is a deadline checked by
//! [`RoomManager::tick`], so nothing runs in the background.

use crate::records::{SerializableColor, now_millis};
use crate::state::DrawingState;
use kurbo::Point;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Room identifier.
///
/// Rooms created here get a UUID, but any non-empty token without
/// whitespace is accepted when joining, so links minted by other clients
/// still resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Trimmed `id`, or `None` if it is empty or contains whitespace.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() || id.contains(char::is_whitespace) {
            return None;
        }
        Some(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used in default room names.
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(8)
            .map_or(self.0.as_str(), |(end, _)| &self.0[..end])
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for users.
pub type UserId = Uuid;

/// Query parameter carrying the room id in share links.
pub const ROOM_QUERY_PARAM: &str = "room";

/// Delay before the simulated participant joins.
pub const DEFAULT_JOIN_DELAY: Duration = Duration::from_secs(2);

/// Colors handed out to participants.
pub const USER_PALETTE: [SerializableColor; 10] = [
    SerializableColor::new(0xFF, 0x6B, 0x6B, 0xFF),
    SerializableColor::new(0x4E, 0xCD, 0xC4, 0xFF),
    SerializableColor::new(0x45, 0xB7, 0xD1, 0xFF),
    SerializableColor::new(0x96, 0xCE, 0xB4, 0xFF),
    SerializableColor::new(0xFF, 0xEA, 0xA7, 0xFF),
    SerializableColor::new(0xDD, 0xA0, 0xDD, 0xFF),
    SerializableColor::new(0x98, 0xD8, 0xC8, 0xFF),
    SerializableColor::new(0xF7, 0xDC, 0x6F, 0xFF),
    SerializableColor::new(0xBB, 0x8F, 0xCE, 0xFF),
    SerializableColor::new(0x85, 0xC1, 0xE9, 0xFF),
];

/// Room errors.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Room name must not be empty")]
    EmptyName,
    #[error("Not a room id or share link: {0}")]
    InvalidRoomId(String),
    #[error("Invalid share link origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),
    #[error("Not in a room")]
    NotInRoom,
}

/// A participant's pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for CursorPosition {
    fn from(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

/// A room participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub color: SerializableColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<CursorPosition>,
    pub is_active: bool,
}

impl User {
    /// A user named `User <n>` with a palette color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let color = USER_PALETTE
            .choose(rng)
            .copied()
            .unwrap_or(USER_PALETTE[0]);
        Self {
            id: Uuid::new_v4(),
            name: format!("User {}", rng.random_range(0..1000u32)),
            color,
            cursor: None,
            is_active: true,
        }
    }
}

/// A shared drawing room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub is_private: bool,
    pub users: Vec<User>,
    pub drawing_state: DrawingState,
    pub created_at: u64,
}

impl Room {
    /// Share link for this room under `origin`.
    pub fn share_link(&self, origin: &str) -> Result<Url, RoomError> {
        share_link(origin, &self.id)
    }
}

/// Build `<origin>?room=<id>`.
pub fn share_link(origin: &str, id: &RoomId) -> Result<Url, RoomError> {
    let mut url = Url::parse(origin)?;
    url.query_pairs_mut()
        .clear()
        .append_pair(ROOM_QUERY_PARAM, id.as_str());
    Ok(url)
}

/// Parse a share link carrying `?room=<id>`, or a bare room id.
pub fn parse_room_reference(reference: &str) -> Result<RoomId, RoomError> {
    let reference = reference.trim();
    let invalid = || RoomError::InvalidRoomId(reference.to_string());

    match Url::parse(reference) {
        Ok(url) if url.has_host() => url
            .query_pairs()
            .find(|(key, _)| *key == ROOM_QUERY_PARAM)
            .and_then(|(_, value)| RoomId::parse(&value))
            .ok_or_else(invalid),
        _ => RoomId::parse(reference).ok_or_else(invalid),
    }
}

/// Tracks the local user's current room.
#[derive(Debug, Clone)]
pub struct RoomManager {
    local_user: User,
    current: Option<Room>,
    join_delay: Duration,
    pending_join: Option<Instant>,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManager {
    /// Create a manager with a randomly named local user.
    pub fn new() -> Self {
        Self::with_local_user(User::random(&mut rand::rng()))
    }

    pub fn with_local_user(local_user: User) -> Self {
        Self {
            local_user,
            current: None,
            join_delay: DEFAULT_JOIN_DELAY,
            pending_join: None,
        }
    }

    /// Set the delay before the simulated participant arrives.
    pub fn with_join_delay(mut self, delay: Duration) -> Self {
        self.join_delay = delay;
        self
    }

    /// Create a room holding a snapshot of `state`, with the local user as
    /// its only member. Replaces any current room.
    pub fn create_room(
        &mut self,
        name: &str,
        is_private: bool,
        state: &DrawingState,
    ) -> Result<&Room, RoomError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let room = Room {
            id: RoomId::generate(),
            name: name.to_string(),
            is_private,
            users: vec![self.local_user.clone()],
            drawing_state: state.clone(),
            created_at: now_millis(),
        };
        log::info!("Created room '{}' ({})", room.name, room.id);
        self.pending_join = None;
        Ok(self.current.insert(room))
    }

    /// Join a room by id or share link. A simulated participant arrives once
    /// [`tick`](Self::tick) is called at or after `now + join_delay`.
    pub fn join_room(&mut self, reference: &str, now: Instant) -> Result<&Room, RoomError> {
        let id = parse_room_reference(reference)?;
        log::info!("Joined room {}", id);
        let room = Room {
            name: format!("Room {}", id.short()),
            id,
            is_private: false,
            users: vec![self.local_user.clone()],
            drawing_state: DrawingState::default(),
            created_at: now_millis(),
        };
        self.pending_join = Some(now + self.join_delay);
        Ok(self.current.insert(room))
    }

    /// Leave the current room, returning it.
    pub fn leave_room(&mut self) -> Result<Room, RoomError> {
        self.pending_join = None;
        let room = self.current.take().ok_or(RoomError::NotInRoom)?;
        log::info!("Left room {}", room.id);
        Ok(room)
    }

    /// Advance the clock. Returns the participant who joined, if the
    /// simulated join came due.
    pub fn tick(&mut self, now: Instant) -> Option<&User> {
        let due = self.pending_join.is_some_and(|deadline| now >= deadline);
        if !due {
            return None;
        }
        self.pending_join = None;

        let room = self.current.as_mut()?;
        let user = User::random(&mut rand::rng());
        log::info!("{} joined room {}", user.name, room.id);
        room.users.push(user);
        room.users.last()
    }

    /// Record the local user's pointer position.
    pub fn set_local_cursor(&mut self, position: Point) {
        self.local_user.cursor = Some(position.into());
        let local_id = self.local_user.id;
        if let Some(user) = self
            .current
            .as_mut()
            .and_then(|room| room.users.iter_mut().find(|user| user.id == local_id))
        {
            user.cursor = Some(position.into());
        }
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.current.as_ref()
    }

    pub fn is_in_room(&self) -> bool {
        self.current.is_some()
    }

    /// Members of the current room; empty when not in a room.
    pub fn users(&self) -> &[User] {
        self.current
            .as_ref()
            .map(|room| room.users.as_slice())
            .unwrap_or_default()
    }

    pub fn local_user(&self) -> &User {
        &self.local_user
    }

    /// Whether a simulated participant is still expected.
    pub fn has_pending_join(&self) -> bool {
        self.pending_join.is_some()
    }

    /// Share link for the current room.
    pub fn share_link(&self, origin: &str) -> Result<Url, RoomError> {
        self.current
            .as_ref()
            .ok_or(RoomError::NotInRoom)?
            .share_link(origin)
    }
}
