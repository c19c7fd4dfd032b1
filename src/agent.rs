use crate::board::SpaceKind;
use crate::game::{Command, Game, TurnPhase};
use crate::player::Money;

pub trait Agent {
    fn choose_command(&self, game: &Game) -> Command;
}

pub fn create_agent(difficulty: usize) -> Box<dyn Agent + Send> {
    match difficulty {
        0 => Box::<CautiousAgent>::default(),
        _ => Box::<GreedyAgent>::default(),
    }
}

/// Rolls and passes; never spends money.
#[derive(Default)]
struct CautiousAgent;
impl Agent for CautiousAgent {
    fn choose_command(&self, game: &Game) -> Command {
        if game.pending_roll() {
            Command::Roll
        } else {
            Command::PassTurn
        }
    }
}

/// Buys whatever it lands on and builds wherever it can, as long as it keeps
/// `reserve` in hand afterwards.
pub struct GreedyAgent {
    pub reserve: Money,
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self { reserve: 200 }
    }
}

impl GreedyAgent {
    fn affordable(&self, game: &Game, cost: Money) -> bool {
        game.current_player().balance - cost >= self.reserve
    }
}

impl Agent for GreedyAgent {
    fn choose_command(&self, game: &Game) -> Command {
        match game.phase() {
            TurnPhase::InJail | TurnPhase::Ended(_) => return Command::Roll,
            TurnPhase::AwaitingRoll | TurnPhase::AwaitingAction => {}
        }
        let me = game.current_player();
        let here = game.board().space(me.position);
        if let Some(price) = here.price() {
            if game.deed(me.position).owner.is_none() && self.affordable(game, price) {
                return Command::PurchaseProperty;
            }
        }
        for space in game.buildable_spaces() {
            if let SpaceKind::Street { house_price, .. } = game.board().space(space).kind {
                if self.affordable(game, house_price) {
                    return Command::PurchaseBuilding(space);
                }
            }
        }
        if game.pending_roll() {
            Command::Roll
        } else {
            Command::PassTurn
        }
    }
}
