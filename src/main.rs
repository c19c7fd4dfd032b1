use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::Receiver;

use monopoly::agent;
use monopoly::event::Notice;
use monopoly::{Board, Command, Dice, Game, GameConfig, Outcome, RandomDice};

const HELP: &str = "\
Commands:
  roll                      roll the dice
  purchase property         buy the space you are on
  purchase house <space>    build on a space (index or name)
  purchase hotel <space>    same as above, once it has 4 houses
  pass turn                 end your turn
  state                     show the game state
  help                      show this list
  quit                      leave the game
";

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(about = "Play Monopoly from the terminal")]
struct Args {
    /// Player names, in turn order.
    #[arg(default_values = ["Player 1", "Player 2"])]
    names: Vec<String>,

    /// Rule overrides in TOML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let the computer play every seat.
    #[arg(long)]
    self_play: bool,
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };

    let mut game = Game::new(Board::standard(), &args.names[..], config)?;
    let notices = game.subscribe();
    let mut dice = RandomDice(rand::thread_rng());
    if args.self_play {
        self_play_loop(&mut game, &mut dice, &notices);
    } else {
        print!("{}", HELP);
        game_loop(&mut game, &mut dice, &notices);
    }
    Ok(())
}

fn print_notices(notices: &Receiver<Notice>) {
    for notice in notices.try_iter() {
        println!("{}", notice.message);
    }
}

fn self_play_loop(game: &mut Game, dice: &mut impl Dice, notices: &Receiver<Notice>) {
    // Let the computer play every seat until somebody wins, or give up.
    let ai = agent::create_agent(1);
    for _ in 0..100_000 {
        if game.winner().is_some() {
            break;
        }
        let command = ai.choose_command(game);
        if let Err(e) = game.execute(command, dice) {
            println!("Error: {}", e);
            break;
        }
        print_notices(notices);
    }
    print!("{}", game);
}

fn game_loop(game: &mut Game, dice: &mut impl Dice, notices: &Receiver<Notice>) {
    let mut input = String::new();
    loop {
        match handle_turn(game, dice, &mut input) {
            Ok(true) => {}
            Ok(false) => {
                break;
            }
            Err(e) => {
                println!("Error: {}", e);
            }
        }
        print_notices(notices);
        input.clear();
    }
}

fn handle_turn(
    game: &mut Game,
    dice: &mut impl Dice,
    input: &mut String,
) -> Result<bool, Box<dyn Error>> {
    if let Some(winner) = game.winner() {
        println!("Game over! {} wins.", game.player(winner).name);
        return Ok(false);
    }
    println!("{}, your move:", game.current_player().name);
    if std::io::stdin().read_line(input)? == 0 {
        return Ok(false);
    }
    match input.trim().to_lowercase().as_str() {
        "quit" | "q" => return Ok(false),
        "help" => {
            print!("{}", HELP);
            return Ok(true);
        }
        "state" | "check game state" => {
            print!("{}", game);
            return Ok(true);
        }
        _ => {}
    }
    let command = Command::parse(input, game.board())?;
    if let Outcome::Rolled(roll) = game.execute(command, dice)? {
        if roll.may_roll_again {
            println!("Doubles! Roll again.");
        }
    }
    Ok(true)
}
