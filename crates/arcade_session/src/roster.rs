//! Presence roster: the canonical list of players on the stage.
//!
//! The roster reacts to presence events: a subscribe on `status/<name>/<id>`
//! spawns a ship for the player and appends them; an unsubscribe removes
//! every entry with that id and disposes their ships. Every applied change
//! rebuilds the roster overlay.

use arcade_math::{Tint, Vec2, Viewport};
use tracing::{debug, info, warn};

use crate::config::CollisionPolicy;
use crate::entity::{EntityFactory, PlayerId, ShipEntity};
use crate::error::RosterError;
use crate::frame::{FrameTick, TickSubscriber};
use crate::overlay::RosterOverlay;
use crate::placement::SpawnPlacement;
use crate::scene::Scene;

/// First segment of every player presence path.
pub const STATUS_ROOT: &str = "status";

/// The fields of a `status/<name>/<id>` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresencePath<'a> {
    pub name: &'a str,
    pub id: &'a str,
}

impl<'a> PresencePath<'a> {
    /// Split a presence path. Segments after the id are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::MalformedPath`] if the path has fewer than
    /// three segments, does not start with `status`, or has an empty name
    /// or id.
    pub fn parse(path: &'a str) -> Result<Self, RosterError> {
        let mut segments = path.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(STATUS_ROOT), Some(name), Some(id)) if !name.is_empty() && !id.is_empty() => {
                Ok(Self { name, id })
            }
            _ => Err(RosterError::MalformedPath {
                path: path.to_string(),
            }),
        }
    }
}

/// A player on the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntity {
    pub id: PlayerId,
    pub name: String,
    pub tint: Tint,
    /// Where the player's ship was spawned.
    pub position: Vec2,
}

/// The outcome of a presence event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    /// A new player was appended.
    Added(PlayerId),
    /// An existing player's ship was respawned in place.
    Replaced(PlayerId),
    /// Entries were removed, one id per removed entry.
    Removed(Vec<PlayerId>),
    /// The event named nobody on the roster.
    Unchanged,
}

struct RosterEntry {
    player: PlayerEntity,
    ship: Box<dyn ShipEntity>,
}

/// Owns the roster, the ships spawned for it, and the overlay showing it.
pub struct PresenceRoster {
    entries: Vec<RosterEntry>,
    overlay: RosterOverlay,
    factory: Box<dyn EntityFactory>,
    placement: Box<dyn SpawnPlacement>,
    viewport: Viewport,
    policy: CollisionPolicy,
}

impl PresenceRoster {
    #[must_use]
    pub fn new(
        viewport: Viewport,
        factory: Box<dyn EntityFactory>,
        placement: Box<dyn SpawnPlacement>,
        policy: CollisionPolicy,
    ) -> Self {
        Self {
            entries: Vec::new(),
            overlay: RosterOverlay::new(),
            factory,
            placement,
            viewport,
            policy,
        }
    }

    /// Apply a presence event.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::MalformedPath`] for paths not shaped like
    /// `status/<name>/<id>` and [`RosterError::IdCollision`] for a rejected
    /// duplicate subscribe. The roster is unchanged in both cases.
    pub fn on_presence_event(
        &mut self,
        path: &str,
        subscribed: bool,
        scene: &mut Scene,
    ) -> Result<RosterChange, RosterError> {
        let parsed = PresencePath::parse(path)?;
        let id = PlayerId::from(parsed.id);
        if subscribed {
            self.add_player(parsed.name, id, scene)
        } else {
            Ok(self.remove_player(&id, scene))
        }
    }

    /// Spawn a ship for `name` and append the player.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::IdCollision`] if `id` is already on the roster
    /// and the policy is [`CollisionPolicy::Reject`].
    pub fn add_player(
        &mut self,
        name: &str,
        id: PlayerId,
        scene: &mut Scene,
    ) -> Result<RosterChange, RosterError> {
        let existing = self.entries.iter().position(|e| e.player.id == id);
        if existing.is_some() && self.policy == CollisionPolicy::Reject {
            warn!(player_id = %id, name, "rejecting duplicate player id");
            return Err(RosterError::IdCollision { id: id.0 });
        }

        let position = self.placement.next_position(&self.viewport);
        let entry = {
            let ship = self.factory.spawn(scene, position, name, &id);
            RosterEntry {
                player: PlayerEntity {
                    id: id.clone(),
                    name: name.to_string(),
                    tint: ship.tint(),
                    position,
                },
                ship,
            }
        };

        let change = match existing {
            Some(index) => {
                let mut old = std::mem::replace(&mut self.entries[index], entry);
                old.ship.remove(scene);
                info!(player_id = %id, name, index, "player replaced");
                RosterChange::Replaced(id)
            }
            None => {
                self.entries.push(entry);
                info!(player_id = %id, name, roster_len = self.entries.len(), "player joined");
                RosterChange::Added(id)
            }
        };

        self.rebuild_overlay(scene);
        Ok(change)
    }

    /// Remove every entry with `id`, disposing their ships in roster order.
    pub fn remove_player(&mut self, id: &PlayerId, scene: &mut Scene) -> RosterChange {
        let (removed, kept): (Vec<RosterEntry>, Vec<RosterEntry>) =
            std::mem::take(&mut self.entries)
                .into_iter()
                .partition(|e| &e.player.id == id);
        self.entries = kept;

        let removed_ids: Vec<PlayerId> = removed
            .into_iter()
            .map(|mut entry| {
                entry.ship.remove(scene);
                entry.player.id
            })
            .collect();

        self.rebuild_overlay(scene);

        if removed_ids.is_empty() {
            debug!(player_id = %id, "unsubscribe for player not on roster");
            return RosterChange::Unchanged;
        }
        info!(
            player_id = %id,
            removed = removed_ids.len(),
            roster_len = self.entries.len(),
            "player left"
        );
        RosterChange::Removed(removed_ids)
    }

    fn rebuild_overlay(&mut self, scene: &mut Scene) {
        self.overlay
            .rebuild(self.entries.iter().map(|e| &e.player), scene);
    }

    /// Players in display order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerEntity> {
        self.entries.iter().map(|e| &e.player)
    }

    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.entries.iter().any(|e| &e.player.id == id)
    }

    #[must_use]
    pub fn overlay(&self) -> &RosterOverlay {
        &self.overlay
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TickSubscriber for PresenceRoster {
    fn on_tick(&mut self, tick: &FrameTick, scene: &mut Scene) {
        for entry in &mut self.entries {
            entry.ship.on_tick(tick, scene);
        }
    }
}
