use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Deed, GroupKey, SpaceId, BOARD_SIZE};
use crate::config::{BankruptcyTransfer, GameConfig};
use crate::construction::{self, BuildPlan, Building};
use crate::dice::{Dice, DiceRoll};
use crate::error::{GameError, ParseCommandError, SetupError};
use crate::event::{EventBus, GameEvent, Notice};
use crate::player::{Money, Player, PlayerId};
use crate::rent::{compute_rent, Payee};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    // The current player has to roll before the turn can be passed.
    AwaitingRoll,
    // Rolled a non-double. May purchase, build or pass the turn.
    AwaitingAction,
    // The current player starts the turn in jail and must roll for doubles.
    InJail,
    // Only the payload player is left standing.
    Ended(PlayerId),
}

impl TurnPhase {
    fn describe(&self) -> &'static str {
        match self {
            TurnPhase::AwaitingRoll => "a roll is pending",
            TurnPhase::AwaitingAction => "no roll is pending",
            TurnPhase::InJail => "in jail",
            TurnPhase::Ended(_) => "the game is over",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Roll,
    PurchaseProperty,
    // Payload: space to put the next house (or hotel) on.
    PurchaseBuilding(SpaceId),
    PassTurn,
}

impl Command {
    // Spaces by index or name: `purchase house 39`, `purchase hotel Boardwalk`.
    pub fn parse(text: &str, board: &Board) -> Result<Self, ParseCommandError> {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let rest = match words.as_slice() {
            ["roll"] => return Ok(Command::Roll),
            ["purchase", "property"] | ["buy"] => return Ok(Command::PurchaseProperty),
            ["pass", "turn"] | ["pass"] => return Ok(Command::PassTurn),
            ["purchase", "house" | "hotel", rest @ ..] | ["build", rest @ ..] => rest,
            _ => return Err(ParseCommandError::Unknown(text.trim().to_owned())),
        };
        if rest.is_empty() {
            return Err(ParseCommandError::MissingSpace);
        }
        let target = rest.join(" ");
        let space = match target.parse::<SpaceId>() {
            Ok(index) => index,
            Err(_) => board
                .find(&target)
                .ok_or(ParseCommandError::UnknownSpace(target))?,
        };
        Ok(Command::PurchaseBuilding(space))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollOutcome {
    pub dice: DiceRoll,
    pub is_double: bool,
    // The same player must roll again before passing.
    pub may_roll_again: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rolled(RollOutcome),
    Purchased(SpaceId),
    Built(BuildPlan),
    // Payload: the new current player.
    TurnPassed(PlayerId),
}

enum Landing {
    Jailed,
    // Payload: the player owed money by the lander, if any.
    Settled(Option<PlayerId>),
}

// Each command either applies completely or returns an error and changes nothing.
pub struct Game {
    pub(crate) board: Board,
    pub(crate) config: GameConfig,
    pub(crate) players: Vec<Player>,
    pub(crate) deeds: Vec<Deed>,
    pub(crate) current: PlayerId,
    pub(crate) phase: TurnPhase,
    pub(crate) last_dice: Option<DiceRoll>,
    pub(crate) events: EventBus,
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for p in &self.players {
            writeln!(f, "{}", p.display(&self.board, &self.config.currency))?;
        }
        for (id, deed) in self.deeds.iter().enumerate() {
            if deed.hotel {
                writeln!(f, "  {}: hotel", self.board.space(id).name)?;
            } else if deed.houses > 0 {
                writeln!(f, "  {}: {} houses", self.board.space(id).name, deed.houses)?;
            }
        }
        if let Some(dice) = self.last_dice {
            writeln!(f, "Last roll: {}", dice)?;
        }
        match self.phase {
            TurnPhase::Ended(winner) => writeln!(f, "Game over, {} won", self.players[winner].name),
            phase => writeln!(f, "{} to play ({:?})", self.players[self.current].name, phase),
        }
    }
}

impl Game {
    pub fn new<S: AsRef<str>>(
        board: Board,
        names: &[S],
        config: GameConfig,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        if names.len() < config.min_players || names.len() > config.max_players {
            return Err(SetupError::PlayerCount {
                min: config.min_players,
                max: config.max_players,
                got: names.len(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].iter().any(|n| n.as_ref() == name.as_ref()) {
                return Err(SetupError::DuplicateName(name.as_ref().to_owned()));
            }
        }
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(i, name.as_ref(), config.starting_balance))
            .collect();
        Ok(Self {
            board,
            config,
            players,
            deeds: vec![Deed::default(); BOARD_SIZE],
            current: 0,
            phase: TurnPhase::AwaitingRoll,
            last_dice: None,
            events: EventBus::default(),
        })
    }

    /*********        READ-ONLY VIEW        *********/

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn pending_roll(&self) -> bool {
        matches!(self.phase, TurnPhase::AwaitingRoll | TurnPhase::InJail)
    }

    pub fn last_dice(&self) -> Option<DiceRoll> {
        self.last_dice
    }

    pub fn deed(&self, space: SpaceId) -> &Deed {
        &self.deeds[space]
    }

    pub fn deeds(&self) -> &[Deed] {
        &self.deeds
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::Ended(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn owns_full_group(&self, player: PlayerId, key: GroupKey) -> bool {
        construction::owns_full_group(&self.board, &self.deeds, player, key)
    }

    pub fn railroads_owned(&self, player: PlayerId) -> usize {
        construction::railroads_owned(&self.board, &self.deeds, player)
    }

    pub fn owns_both_utilities(&self, player: PlayerId) -> bool {
        construction::owns_both_utilities(&self.board, &self.deeds, player)
    }

    pub fn buildable_spaces(&self) -> Vec<SpaceId> {
        construction::buildable_spaces(&self.board, &self.deeds, self.current_player())
    }

    pub fn subscribe(&mut self) -> Receiver<Notice> {
        self.events.subscribe()
    }

    /*********        COMMANDS        *********/

    pub fn execute(&mut self, command: Command, dice: &mut impl Dice) -> Result<Outcome, GameError> {
        match command {
            Command::Roll => self.roll(dice).map(Outcome::Rolled),
            Command::PurchaseProperty => self.purchase_property().map(Outcome::Purchased),
            Command::PurchaseBuilding(space) => self.purchase_building(space).map(Outcome::Built),
            Command::PassTurn => self.pass_turn().map(Outcome::TurnPassed),
        }
    }

    pub fn roll(&mut self, dice: &mut impl Dice) -> Result<RollOutcome, GameError> {
        match self.phase {
            TurnPhase::AwaitingRoll | TurnPhase::InJail => {}
            TurnPhase::Ended(_) => return Err(self.rejected("roll", GameError::GameAlreadyEnded)),
            phase => return Err(self.rejected("roll", invalid("roll", phase))),
        }
        let roll = dice.throw();
        if DiceRoll::new(roll.0, roll.1).is_none() {
            panic!("Invalid dice roll: {}", roll);
        }
        self.last_dice = Some(roll);
        self.emit(GameEvent::DiceRolled {
            player: self.current,
            dice: roll,
        });

        let may_roll_again = if self.players[self.current].in_jail {
            self.roll_in_jail(roll);
            false
        } else {
            self.roll_and_move(roll)
        };
        Ok(RollOutcome {
            dice: roll,
            is_double: roll.is_double(),
            may_roll_again,
        })
    }

    pub fn purchase_property(&mut self) -> Result<SpaceId, GameError> {
        self.try_purchase_property()
            .map_err(|e| self.rejected("purchase property", e))
    }

    pub fn purchase_building(&mut self, space: SpaceId) -> Result<BuildPlan, GameError> {
        self.try_purchase_building(space)
            .map_err(|e| self.rejected("purchase house/hotel", e))
    }

    pub fn pass_turn(&mut self) -> Result<PlayerId, GameError> {
        match self.phase {
            TurnPhase::AwaitingAction => {
                self.advance_turn();
                Ok(self.current)
            }
            TurnPhase::Ended(_) => Err(self.rejected("pass turn", GameError::GameAlreadyEnded)),
            phase => Err(self.rejected("pass turn", invalid("pass turn", phase))),
        }
    }

    /*********        COMMAND INTERNALS        *********/

    fn try_purchase_property(&mut self) -> Result<SpaceId, GameError> {
        self.ensure_may_trade("purchase property")?;
        let id = self.current;
        let position = self.players[id].position;
        let space = self.board.space(position);
        let price = space
            .price()
            .ok_or_else(|| GameError::PropertyNotPurchasable(space.name.clone()))?;
        match self.deeds[position].owner {
            Some(owner) if owner == id => {
                return Err(GameError::PropertyAlreadyOwnedBySelf(space.name.clone()))
            }
            Some(_) => return Err(GameError::PropertyOwnedByOther(space.name.clone())),
            None => {}
        }
        let balance = self.players[id].balance;
        if balance < price {
            return Err(GameError::InsufficientFunds {
                needed: price,
                available: balance,
            });
        }

        let group = space.group();
        self.players[id].balance -= price;
        self.players[id].owned.insert(position);
        self.deeds[position].owner = Some(id);
        self.emit(GameEvent::PropertyPurchased {
            player: id,
            space: position,
            price,
        });
        if let Some(GroupKey::Color(color)) = group {
            if self.owns_full_group(id, GroupKey::Color(color)) {
                self.emit(GameEvent::GroupCompleted {
                    player: id,
                    group: color,
                });
            }
        }
        Ok(position)
    }

    fn try_purchase_building(&mut self, space: SpaceId) -> Result<BuildPlan, GameError> {
        self.ensure_may_trade("purchase house/hotel")?;
        let id = self.current;
        let plan = construction::validate_build(&self.board, &self.deeds, &self.players[id], space)?;
        self.players[id].balance -= plan.cost;
        construction::apply_build(&mut self.deeds, &plan);
        self.emit(match plan.building {
            Building::House(houses) => GameEvent::HouseBuilt {
                player: id,
                space,
                houses,
            },
            Building::Hotel => GameEvent::HotelBuilt { player: id, space },
        });
        Ok(plan)
    }

    fn ensure_may_trade(&self, command: &'static str) -> Result<(), GameError> {
        match self.phase {
            TurnPhase::AwaitingRoll | TurnPhase::AwaitingAction => Ok(()),
            TurnPhase::Ended(_) => Err(GameError::GameAlreadyEnded),
            phase => Err(invalid(command, phase)),
        }
    }

    fn roll_in_jail(&mut self, roll: DiceRoll) {
        let id = self.current;
        let mut creditor = None;
        if roll.is_double() {
            self.release_from_jail(id, None);
            if self.config.jail_double_moves {
                if let Landing::Settled(owed) = self.advance_by(roll) {
                    creditor = owed;
                }
            }
        } else {
            let player = &mut self.players[id];
            player.turns_in_jail += 1;
            let turns = player.turns_in_jail;
            if turns >= self.config.max_turns_in_jail {
                let fine = self.config.jail_fine;
                self.players[id].balance -= fine;
                self.release_from_jail(id, Some(fine));
            } else {
                self.emit(GameEvent::StayedInJail { player: id, turns });
            }
        }
        // A jail roll always uses up the whole turn.
        if !self.settle_solvency(id, creditor) {
            self.end_turn();
        }
    }

    // Returns whether the player may roll again.
    fn roll_and_move(&mut self, roll: DiceRoll) -> bool {
        let id = self.current;
        if roll.is_double() {
            self.players[id].consecutive_doubles += 1;
            if self.players[id].consecutive_doubles >= self.config.max_consecutive_doubles {
                self.send_to_jail(id);
                self.end_turn();
                return false;
            }
        }
        match self.advance_by(roll) {
            Landing::Jailed => {
                self.end_turn();
                false
            }
            Landing::Settled(creditor) => {
                if self.settle_solvency(id, creditor) {
                    return false;
                }
                if roll.is_double() {
                    self.phase = TurnPhase::AwaitingRoll;
                    true
                } else {
                    self.players[id].consecutive_doubles = 0;
                    self.phase = TurnPhase::AwaitingAction;
                    false
                }
            }
        }
    }

    fn advance_by(&mut self, roll: DiceRoll) -> Landing {
        let id = self.current;
        let size = self.board.len();
        let target = self.players[id].position + roll.sum() as usize;
        if target >= size {
            let bonus = self.config.pass_go_bonus;
            self.players[id].balance += bonus;
            self.emit(GameEvent::PassedGo { player: id, bonus });
        }
        let to = target % size;
        self.players[id].position = to;
        if to == self.board.go_to_jail() {
            self.send_to_jail(id);
            return Landing::Jailed;
        }
        self.emit(GameEvent::Moved { player: id, to });
        Landing::Settled(self.collect_rent(id, to, roll))
    }

    // Returns the player owed, if the debt was not to the bank.
    fn collect_rent(&mut self, payer: PlayerId, space: SpaceId, roll: DiceRoll) -> Option<PlayerId> {
        let due = compute_rent(&self.board, &self.deeds, space, payer, roll)?;
        self.players[payer].balance -= due.amount;
        match due.payee {
            Payee::Bank => {
                self.emit(GameEvent::TaxPaid {
                    player: payer,
                    space,
                    amount: due.amount,
                });
                None
            }
            Payee::Player(owner) => {
                self.players[owner].balance += due.amount;
                self.emit(GameEvent::RentPaid {
                    payer,
                    owner,
                    space,
                    amount: due.amount,
                });
                Some(owner)
            }
        }
    }

    fn send_to_jail(&mut self, id: PlayerId) {
        let player = &mut self.players[id];
        player.position = self.board.jail();
        player.in_jail = true;
        player.turns_in_jail = 0;
        player.consecutive_doubles = 0;
        self.emit(GameEvent::SentToJail { player: id });
    }

    fn release_from_jail(&mut self, id: PlayerId, fine: Option<Money>) {
        let player = &mut self.players[id];
        player.in_jail = false;
        player.turns_in_jail = 0;
        self.emit(GameEvent::ReleasedFromJail { player: id, fine });
    }

    // Returns true if `id` went bankrupt; the turn has then already moved on.
    fn settle_solvency(&mut self, id: PlayerId, creditor: Option<PlayerId>) -> bool {
        if self.players[id].balance >= 0 {
            return false;
        }
        self.declare_bankrupt(id, creditor);
        if !self.check_winner() && id == self.current {
            self.advance_turn();
        }
        true
    }

    fn declare_bankrupt(&mut self, id: PlayerId, creditor: Option<PlayerId>) {
        let heir = match self.config.bankruptcy_transfer {
            BankruptcyTransfer::Bank => None,
            BankruptcyTransfer::Creditor => creditor.filter(|&c| c != id),
        };
        let spaces = std::mem::take(&mut self.players[id].owned);
        for space in spaces {
            self.deeds[space].release();
            if let Some(heir) = heir {
                self.deeds[space].owner = Some(heir);
                self.players[heir].owned.insert(space);
            }
        }
        let player = &mut self.players[id];
        player.bankrupt = true;
        player.in_jail = false;
        player.turns_in_jail = 0;
        player.consecutive_doubles = 0;
        log::info!("{} is bankrupt with a balance of {}", player.name, player.balance);
        self.emit(GameEvent::Bankrupt {
            player: id,
            creditor: heir,
        });
    }

    fn check_winner(&mut self) -> bool {
        let mut standing = self.players.iter().filter(|p| !p.bankrupt);
        let winner = match (standing.next(), standing.next()) {
            (Some(p), None) => p.id,
            _ => return false,
        };
        self.phase = TurnPhase::Ended(winner);
        self.emit(GameEvent::GameWon { winner });
        true
    }

    fn end_turn(&mut self) {
        if !matches!(self.phase, TurnPhase::Ended(_)) {
            self.advance_turn();
        }
    }

    // Skips bankrupt players.
    fn advance_turn(&mut self) {
        let departing = self.current;
        self.players[departing].consecutive_doubles = 0;
        let count = self.players.len();
        let mut next = departing;
        // At most one full lap; lands back on `departing` if nobody else is left.
        for _ in 0..count {
            next = (next + 1) % count;
            if !self.players[next].bankrupt {
                break;
            }
        }
        self.current = next;
        self.phase = if self.players[next].in_jail {
            TurnPhase::InJail
        } else {
            TurnPhase::AwaitingRoll
        };
        self.emit(GameEvent::TurnPassed { to: next });
    }

    /*********        EVENTS        *********/

    fn emit(&mut self, event: GameEvent) {
        let message = self.describe(&event);
        self.events.publish(Notice { event, message });
    }

    fn rejected(&self, command: &str, error: GameError) -> GameError {
        log::debug!(
            "{} rejected for {}: {}",
            command,
            self.players[self.current].name,
            error
        );
        error
    }

    pub fn describe(&self, event: &GameEvent) -> String {
        let name = |id: PlayerId| self.players[id].name.as_str();
        let space = |id: SpaceId| self.board.space(id).name.as_str();
        let cur = &self.config.currency;
        match *event {
            GameEvent::DiceRolled { player, dice } => {
                let double = if dice.is_double() { " (double)" } else { "" };
                format!("{} rolled {}{}", name(player), dice, double)
            }
            GameEvent::Moved { player, to } => format!("{} landed on {}", name(player), space(to)),
            GameEvent::PassedGo { player, bonus } => {
                format!("{} passed Go and collected {}{}", name(player), cur, bonus)
            }
            GameEvent::SentToJail { player } => format!("{} has been sent to Jail", name(player)),
            GameEvent::StayedInJail { player, turns } => {
                format!("{} did not roll a double ({} turns in Jail)", name(player), turns)
            }
            GameEvent::ReleasedFromJail { player, fine: None } => {
                format!("{} rolled a double and is out of Jail", name(player))
            }
            GameEvent::ReleasedFromJail {
                player,
                fine: Some(fine),
            } => format!("{} paid {}{} to get out of Jail", name(player), cur, fine),
            GameEvent::RentPaid {
                payer,
                owner,
                space: at,
                amount,
            } => format!(
                "{} paid {}{} rent to {} on {}",
                name(payer),
                cur,
                amount,
                name(owner),
                space(at)
            ),
            GameEvent::TaxPaid {
                player,
                space: at,
                amount,
            } => format!("{} paid {}{} in {}", name(player), cur, amount, space(at)),
            GameEvent::PropertyPurchased {
                player,
                space: at,
                price,
            } => format!("{} purchased {} for {}{}", name(player), space(at), cur, price),
            GameEvent::GroupCompleted { player, group } => {
                format!("{} now owns every {:?} property", name(player), group)
            }
            GameEvent::HouseBuilt {
                player,
                space: at,
                houses,
            } => format!("{} built house {} on {}", name(player), houses, space(at)),
            GameEvent::HotelBuilt { player, space: at } => {
                format!("{} built a hotel on {}", name(player), space(at))
            }
            GameEvent::Bankrupt {
                player,
                creditor: Some(heir),
            } => format!(
                "{} has gone bankrupt; their properties go to {}",
                name(player),
                name(heir)
            ),
            GameEvent::Bankrupt {
                player,
                creditor: None,
            } => format!(
                "{} has gone bankrupt; their properties return to the bank",
                name(player)
            ),
            GameEvent::TurnPassed { to } => {
                if self.players[to].in_jail {
                    format!("It's now {}'s turn. Roll a double to get out of Jail", name(to))
                } else {
                    format!("It's now {}'s turn", name(to))
                }
            }
            GameEvent::GameWon { winner } => format!("The game has ended. {} wins!", name(winner)),
        }
    }
}

fn invalid(command: &'static str, phase: TurnPhase) -> GameError {
    GameError::InvalidCommandForState {
        command,
        state: phase.describe(),
    }
}
