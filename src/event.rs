use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::board::{ColorGroup, SpaceId};
use crate::dice::DiceRoll;
use crate::player::{Money, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    DiceRolled {
        player: PlayerId,
        dice: DiceRoll,
    },
    Moved {
        player: PlayerId,
        to: SpaceId,
    },
    PassedGo {
        player: PlayerId,
        bonus: Money,
    },
    SentToJail {
        player: PlayerId,
    },
    StayedInJail {
        player: PlayerId,
        turns: u8,
    },
    ReleasedFromJail {
        player: PlayerId,
        // None when released by a double.
        fine: Option<Money>,
    },
    RentPaid {
        payer: PlayerId,
        owner: PlayerId,
        space: SpaceId,
        amount: Money,
    },
    TaxPaid {
        player: PlayerId,
        space: SpaceId,
        amount: Money,
    },
    PropertyPurchased {
        player: PlayerId,
        space: SpaceId,
        price: Money,
    },
    GroupCompleted {
        player: PlayerId,
        group: ColorGroup,
    },
    HouseBuilt {
        player: PlayerId,
        space: SpaceId,
        houses: u8,
    },
    HotelBuilt {
        player: PlayerId,
        space: SpaceId,
    },
    Bankrupt {
        player: PlayerId,
        creditor: Option<PlayerId>,
    },
    TurnPassed {
        to: PlayerId,
    },
    GameWon {
        winner: PlayerId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub event: GameEvent,
    pub message: String,
}

/// Fan-out of notices to any number of subscribers. Dropped receivers are
/// forgotten on the next publish.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<Notice>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> Receiver<Notice> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, notice: Notice) {
        log::info!("{}", notice.message);
        self.subscribers
            .retain(|tx| tx.send(notice.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventBus({} subscribers)", self.subscribers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(to: PlayerId) -> Notice {
        Notice {
            event: GameEvent::TurnPassed { to },
            message: format!("It's now player {}'s turn", to),
        }
    }

    #[test]
    fn fans_out_to_every_subscriber() {
        let mut bus = EventBus::default();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(notice(1));
        assert_eq!(a.try_recv().unwrap(), notice(1));
        assert_eq!(b.try_recv().unwrap(), notice(1));
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn forgets_dropped_subscribers() {
        let mut bus = EventBus::default();
        let a = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);
        bus.publish(notice(0));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(a.try_iter().count(), 1);
    }
}
