use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::*;

/// Handle to a watch session; a stale handle never reaches a newer session in the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    slot: u32,
    generation: u32,
}

/// What is being watched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub title: String,
    /// Once this many seconds are watched the session completes.
    pub length_secs: Option<u64>,
}

impl VideoRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            length_secs: None,
        }
    }

    pub fn with_length(mut self, length_secs: u64) -> Self {
        self.length_secs = Some(length_secs);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WatchSession {
    id: SessionId,
    video: VideoRef,
    seconds_watched: u64,
    coins_earned: u64,
    next_reward_in: u32,
    completed: bool,
    /// Clock reading up to which ticks have been applied by `catch_up`.
    ticked_until: Option<Duration>,
}

impl WatchSession {
    fn new(id: SessionId, video: VideoRef, policy: &WatchPolicy) -> Self {
        Self {
            id,
            video,
            seconds_watched: 0,
            coins_earned: 0,
            next_reward_in: policy.interval(),
            completed: false,
            ticked_until: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn video(&self) -> &VideoRef {
        &self.video
    }

    pub fn seconds_watched(&self) -> u64 {
        self.seconds_watched
    }

    pub fn coins_earned(&self) -> u64 {
        self.coins_earned
    }

    pub fn next_reward_in(&self) -> u32 {
        self.next_reward_in
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn tick(&mut self, policy: &WatchPolicy) -> Option<RewardEvent> {
        if self.completed {
            return None;
        }

        self.seconds_watched += 1;
        self.next_reward_in = self.next_reward_in.saturating_sub(1);

        let event = if self.next_reward_in == 0 {
            self.next_reward_in = policy.interval();
            self.coins_earned += u64::from(policy.reward_per_interval);
            Some(RewardEvent {
                amount: policy.reward_per_interval,
                description: format!("Watching reward: {}", self.video.title),
            })
        } else {
            None
        };

        if let Some(length) = self.video.length_secs {
            if self.seconds_watched >= length {
                self.completed = true;
                log::debug!(
                    "Session {:?} completed {} after {}s",
                    self.id,
                    self.video.id,
                    self.seconds_watched
                );
            }
        }

        event
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    session: Option<WatchSession>,
}

/// Owns every active watch session and applies the 1-second ticks to them.
///
/// Sessions live in generational slots: stopping a session bumps its slot's
/// generation, so ticks scheduled for it turn into no-ops even after the slot
/// is reused.
#[derive(Clone, Debug, Default)]
pub struct RewardScheduler {
    policy: WatchPolicy,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl RewardScheduler {
    pub fn new(policy: WatchPolicy) -> Self {
        Self {
            policy,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn policy(&self) -> &WatchPolicy {
        &self.policy
    }

    pub fn start_session(&mut self, video: VideoRef) -> SessionId {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let entry = &mut self.slots[slot as usize];
        let id = SessionId {
            slot,
            generation: entry.generation,
        };
        log::debug!("Starting session {:?} for {}", id, video.id);
        entry.session = Some(WatchSession::new(id, video, &self.policy));
        id
    }

    pub fn session(&self, id: SessionId) -> Option<&WatchSession> {
        self.slots
            .get(id.slot as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.session.as_ref())
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut WatchSession> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.session.as_mut())
    }

    pub fn active_sessions(&self) -> usize {
        self.slots.iter().filter(|slot| slot.session.is_some()).count()
    }

    /// Applies one second of watching; stale or completed sessions are ignored.
    pub fn on_tick(&mut self, id: SessionId) -> Option<RewardEvent> {
        let policy = self.policy;
        match self.session_mut(id) {
            Some(session) => session.tick(&policy),
            None => {
                log::trace!("Dropping tick for stale session {:?}", id);
                None
            }
        }
    }

    /// Applies one tick per whole second elapsed on `clock` since the previous call.
    ///
    /// The first call only anchors the session to the clock.
    pub fn catch_up<C: Clock + ?Sized>(&mut self, id: SessionId, clock: &C) -> Vec<RewardEvent> {
        let now = clock.now();
        let policy = self.policy;
        let Some(session) = self.session_mut(id) else {
            return Vec::new();
        };

        let Some(anchor) = session.ticked_until else {
            session.ticked_until = Some(now);
            return Vec::new();
        };

        let ticks = now.saturating_sub(anchor).as_secs();
        session.ticked_until = Some(anchor + Duration::from_secs(ticks));

        let mut events = Vec::new();
        for _ in 0..ticks {
            if session.completed {
                break;
            }
            events.extend(session.tick(&policy));
        }
        events
    }

    /// Tears the session down; intervals in progress earn nothing.
    pub fn stop_session(&mut self, id: SessionId) -> Option<WatchSession> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let session = slot.session.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        log::debug!(
            "Stopped session {:?} after {}s, {} coins",
            id,
            session.seconds_watched,
            session.coins_earned
        );
        Some(session)
    }
}
