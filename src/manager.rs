use crate::{
    Audience, ConnectionId, Deck, DeckError, Delivery, Intent, IntentError, MatchId, MatchState,
    Notification, PlayerInfo, Seat, MATCH_LIMIT, SEATS,
};
use bimap::BiHashMap;
use itertools::Itertools;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Runtime settings of a [MatchManager].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Seeds every shuffle when present, so that matches are reproducible.
    pub seed: Option<u64>,
    /// The maximum number of matches hosted at once.
    pub match_limit: usize,
}

impl Default for ManagerConfig {
    fn default() -> ManagerConfig {
        ManagerConfig {
            seed: None,
            match_limit: MATCH_LIMIT,
        }
    }
}

/// Describes the reason why a [MatchManager] could not serve a request.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ManagerError {
    /// No hosted match has the id.
    #[error("{0} is not hosted")]
    UnknownMatch(MatchId),
    /// The connection is neither in the lobby nor seated in a match.
    #[error("connection {0} is not seated")]
    UnknownConnection(ConnectionId),
    /// The connection is already in the lobby or seated in a match.
    #[error("connection {0} already joined")]
    AlreadyJoined(ConnectionId),
    /// [ManagerConfig::match_limit] matches are already hosted.
    #[error("no more than {0} matches can be hosted at once")]
    MatchLimit(usize),
    /// The deck could not be dealt.
    #[error(transparent)]
    Deck(#[from] DeckError),
    /// The match rejected the intent for every contained reason.
    #[error("intent rejected: {0:?}")]
    Rejected(HashSet<IntentError>),
}

/// A [Notification] addressed to connections.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Envelope {
    /// The receiving connections in seat order.
    pub to: Vec<ConnectionId>,
    /// The message.
    pub notification: Notification,
}

/// A hosted match with its seat bindings.
#[derive(Debug)]
struct MatchEntry {
    state: MatchState,
    seats: BiHashMap<Seat, ConnectionId>,
}

/// Seats joining connections in a lobby, starts a match for every [SEATS] of them, and routes
/// intents to the match of the sending connection.
///
/// Every match sits behind its own lock, so intents of one match are applied one at a time
/// while other matches proceed. Locks are taken in the order lobby, connections, matches, and
/// then a single match.
#[derive(Debug)]
pub struct MatchManager {
    config: ManagerConfig,
    /// Players waiting for a match in arrival order.
    lobby: Mutex<Vec<PlayerInfo>>,
    /// The match of every seated connection.
    connections: Mutex<HashMap<ConnectionId, MatchId>>,
    matches: RwLock<HashMap<MatchId, Arc<Mutex<MatchEntry>>>>,
    next_match_id: AtomicU64,
    rng: Mutex<StdRng>,
}

impl MatchManager {
    /// Creates a [MatchManager] without matches, shuffling from `config.seed` when present
    /// and from entropy otherwise.
    pub fn new(config: ManagerConfig) -> MatchManager {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        MatchManager {
            config,
            lobby: Mutex::new(Vec::with_capacity(SEATS)),
            connections: Mutex::new(HashMap::new()),
            matches: RwLock::new(HashMap::new()),
            next_match_id: AtomicU64::new(1),
            rng: Mutex::new(rng),
        }
    }

    /// Seats `connection_id` in the lobby under a [normalized](crate::normalize_display_name)
    /// `display_name`. The first arrival is the first player. The arrival filling the last
    /// seat starts a match.
    ///
    /// # Returns
    ///
    /// A [Notification::PlayersChanged] for the lobby, followed by the
    /// [start deliveries](MatchState::start_deliveries) when a match started.
    ///
    /// # Errors
    ///
    /// * [ManagerError::AlreadyJoined] Attempting to join from a connection in the lobby or in
    /// a match.
    /// * [ManagerError::MatchLimit] Attempting to fill the lobby while the limit of matches is
    /// hosted. The lobby is left as it was.
    /// * [ManagerError::Deck] Dealing the match failed. The lobby is left as it was.
    pub fn join(
        &self,
        connection_id: impl Into<ConnectionId>,
        display_name: &str,
    ) -> Result<Vec<Envelope>, ManagerError> {
        let connection_id = connection_id.into();
        // held until the match is hosted, so a seated connection can't wait in the lobby
        let mut lobby = self.lobby.lock();
        if lobby
            .iter()
            .any(|player| player.connection_id == connection_id)
            || self.connections.lock().contains_key(&connection_id)
        {
            return Err(ManagerError::AlreadyJoined(connection_id));
        }

        let player = PlayerInfo::new(connection_id, display_name);
        log::info!(
            "{} joined the lobby at seat {}",
            player.display_name,
            lobby.len() + 1
        );
        lobby.push(player);
        if lobby.len() < SEATS {
            return Ok(vec![players_changed(&lobby)]);
        }

        let Ok(players) = <[PlayerInfo; SEATS]>::try_from(lobby.clone()) else {
            unreachable!("a full lobby holds exactly {SEATS} players.");
        };
        match self.start_match(players) {
            Ok((_, started)) => {
                let mut envelopes = vec![players_changed(&lobby)];
                envelopes.extend(started);
                lobby.clear();
                Ok(envelopes)
            }
            Err(error) => {
                if let Some(player) = lobby.pop() {
                    log::warn!("{} could not fill the lobby: {error}", player.display_name);
                }
                Err(error)
            }
        }
    }

    /// Deals a new match to `players` in seat order.
    ///
    /// # Returns
    ///
    /// The id of the match and its [start deliveries](MatchState::start_deliveries).
    ///
    /// # Errors
    ///
    /// * [ManagerError::MatchLimit] Attempting to start while the limit of matches is hosted.
    /// * [ManagerError::Deck] Dealing the match failed.
    pub fn start_match(
        &self,
        players: [PlayerInfo; SEATS],
    ) -> Result<(MatchId, Vec<Envelope>), ManagerError> {
        let deal = Deck::new(&mut *self.rng.lock()).deal()?;
        let mut connections = self.connections.lock();
        let mut matches = self.matches.write();
        if matches.len() >= self.config.match_limit {
            return Err(ManagerError::MatchLimit(self.config.match_limit));
        }

        let id = MatchId(self.next_match_id.fetch_add(1, Ordering::Relaxed));
        let seats: BiHashMap<Seat, ConnectionId> = players
            .iter()
            .enumerate()
            .map(|(index, player)| (index + 1, player.connection_id.clone()))
            .collect();
        let state = MatchState::new(players, deal);
        let envelopes = route(&seats, state.start_deliveries());

        connections.extend(seats.right_values().map(|connection_id| (connection_id.clone(), id)));
        matches.insert(id, Arc::new(Mutex::new(MatchEntry { state, seats })));
        log::info!("{id} started");
        Ok((id, envelopes))
    }

    /// Applies `intent` for the seat of `connection_id` in its match.
    ///
    /// # Returns
    ///
    /// The deliveries of the match addressed to connections. A match that ended is
    /// [closed](MatchManager::close), so its players may join again.
    ///
    /// # Errors
    ///
    /// * [ManagerError::UnknownConnection] Attempting to act from a connection that is not
    /// seated in a match.
    /// * [ManagerError::Rejected] The match rejected the intent.
    pub fn handle(
        &self,
        connection_id: &str,
        intent: &Intent,
    ) -> Result<Vec<Envelope>, ManagerError> {
        let unknown = || ManagerError::UnknownConnection(connection_id.to_owned());
        let id = *self.connections.lock().get(connection_id).ok_or_else(unknown)?;
        let entry = self.entry(id)?;
        let mut entry = entry.lock();

        let seat = *entry.seats.get_by_right(connection_id).ok_or_else(unknown)?;
        let deliveries = entry
            .state
            .apply(seat, intent)
            .map_err(ManagerError::Rejected)?;
        let envelopes = route(&entry.seats, deliveries);
        let ended = !entry.state.is_active();
        drop(entry);

        if ended {
            if let Err(error) = self.close(id) {
                log::debug!("{id} ended but was not closed: {error}");
            }
        }
        Ok(envelopes)
    }

    /// Removes `connection_id` from the lobby, re-seating everyone after it, or unbinds it from
    /// its match, where the hand stays in play.
    ///
    /// # Returns
    ///
    /// A [Notification::PlayersChanged] for the lobby when the connection left the lobby.
    ///
    /// # Errors
    ///
    /// * [ManagerError::UnknownConnection] The connection is neither in the lobby nor in a
    /// match.
    pub fn disconnect(&self, connection_id: &str) -> Result<Vec<Envelope>, ManagerError> {
        let mut lobby = self.lobby.lock();
        if let Some(index) = lobby
            .iter()
            .position(|player| player.connection_id == connection_id)
        {
            let player = lobby.remove(index);
            log::info!("{} left the lobby", player.display_name);
            return Ok(if lobby.is_empty() {
                Vec::new()
            } else {
                vec![players_changed(&lobby)]
            });
        }
        drop(lobby);

        let Some(id) = self.connections.lock().remove(connection_id) else {
            return Err(ManagerError::UnknownConnection(connection_id.to_owned()));
        };
        let entry = self.entry(id)?;
        let mut entry = entry.lock();
        if let Some((seat, _)) = entry.seats.remove_by_right(connection_id) {
            entry.state.disconnect(seat);
        }
        Ok(Vec::new())
    }

    /// Stops hosting the match `id` and forgets its connections.
    ///
    /// # Returns
    ///
    /// The final state of the match.
    ///
    /// # Errors
    ///
    /// * [ManagerError::UnknownMatch] No hosted match has the id.
    pub fn close(&self, id: MatchId) -> Result<MatchState, ManagerError> {
        let mut connections = self.connections.lock();
        let Some(entry) = self.matches.write().remove(&id) else {
            return Err(ManagerError::UnknownMatch(id));
        };
        let entry = entry.lock();
        for connection_id in entry.seats.right_values() {
            connections.remove(connection_id);
        }
        log::info!("{id} closed");
        Ok(entry.state.clone())
    }

    /// Calls `f` with the state of match `id`.
    ///
    /// # Errors
    ///
    /// * [ManagerError::UnknownMatch] No hosted match has the id.
    pub fn with_match<T>(
        &self,
        id: MatchId,
        f: impl FnOnce(&MatchState) -> T,
    ) -> Result<T, ManagerError> {
        let entry = self.entry(id)?;
        let entry = entry.lock();
        Ok(f(&entry.state))
    }

    /// # Returns
    ///
    /// The match `connection_id` is seated in.
    pub fn match_of(&self, connection_id: &str) -> Option<MatchId> {
        self.connections.lock().get(connection_id).copied()
    }

    /// # Returns
    ///
    /// The ids of every hosted match in ascending order.
    pub fn match_ids(&self) -> Vec<MatchId> {
        self.matches.read().keys().copied().sorted().collect()
    }

    /// # Returns
    ///
    /// The number of players waiting in the lobby.
    pub fn lobby_len(&self) -> usize {
        self.lobby.lock().len()
    }

    fn entry(&self, id: MatchId) -> Result<Arc<Mutex<MatchEntry>>, ManagerError> {
        self.matches
            .read()
            .get(&id)
            .cloned()
            .ok_or(ManagerError::UnknownMatch(id))
    }
}

/// A [Notification::PlayersChanged] for everyone in `lobby`.
fn players_changed(lobby: &[PlayerInfo]) -> Envelope {
    Envelope {
        to: lobby
            .iter()
            .map(|player| player.connection_id.clone())
            .collect(),
        notification: Notification::PlayersChanged {
            players: lobby
                .iter()
                .map(|player| player.display_name.clone())
                .collect(),
        },
    }
}

/// Addresses `deliveries` to the connections bound in `seats`. Deliveries to unbound seats
/// reach nobody.
fn route(seats: &BiHashMap<Seat, ConnectionId>, deliveries: Vec<Delivery>) -> Vec<Envelope> {
    deliveries
        .into_iter()
        .map(|delivery| {
            let to = match delivery.audience {
                Audience::Everyone => (1..=SEATS)
                    .filter_map(|seat| seats.get_by_left(&seat).cloned())
                    .collect(),
                Audience::Seat(seat) => seats.get_by_left(&seat).cloned().into_iter().collect(),
            };
            Envelope {
                to,
                notification: delivery.notification,
            }
        })
        .collect()
}
