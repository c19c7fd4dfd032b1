use std::error::Error;
use std::io::BufRead;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use monopoly::agent::{self, Agent};
use monopoly::{Board, Command, Game, GameConfig, RandomDice};

#[derive(Parser, Debug)]
#[command(about = "Play against the computer from the terminal")]
struct Args {
    /// Names of the human players.
    #[arg(default_value = "You")]
    humans: Vec<String>,

    /// Computer players seated after the humans.
    #[arg(short, long, default_value_t = 1)]
    computers: usize,

    /// Seed for the dice.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let human_count = args.humans.len();
    let mut names = args.humans;
    names.extend((1..=args.computers).map(|i| format!("Computer {}", i)));

    let mut game = Game::new(Board::standard(), &names[..], GameConfig::default())?;
    let mut dice = RandomDice(match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    });
    let ai = agent::create_agent(1);
    let notices = game.subscribe();
    print!("{}", game);

    // Computer seats move without prompting.
    let mut stdin = std::io::stdin().lock();
    let mut input = String::new();
    loop {
        match handle_turn(&game, ai.as_ref(), human_count, &mut stdin, &mut input) {
            Ok(Some(command)) => match game.execute(command, &mut dice) {
                Ok(_) => {
                    for notice in notices.try_iter() {
                        println!("{}", notice.message);
                    }
                    if let Some(winner) = game.winner() {
                        println!("Game over! {} wins.\n{}", game.player(winner).name, game);
                        break;
                    }
                }
                Err(e) => {
                    println!("Error: {}", e);
                }
            },
            Ok(None) => {
                break;
            }
            Err(e) => {
                println!("Error: {}", e);
            }
        }
        input.clear();
    }
    Ok(())
}

fn handle_turn(
    game: &Game,
    ai: &dyn Agent,
    human_count: usize,
    reader: &mut impl BufRead,
    input: &mut String,
) -> Result<Option<Command>, Box<dyn Error>> {
    let player = game.current_player();
    if player.id >= human_count {
        return Ok(Some(ai.choose_command(game)));
    }
    println!("\n{}", player.display(game.board(), &game.config().currency));
    if game.pending_roll() {
        println!("Type 'roll', 'state' or 'q' to quit:");
    } else {
        println!("Type 'purchase property', 'purchase house <space>', 'pass turn', 'state' or 'q' to quit:");
    }
    loop {
        if reader.read_line(input)? == 0 {
            return Ok(None);
        }
        match input.trim() {
            "q" => return Ok(None),
            "state" => print!("{}", game),
            text => return Ok(Some(Command::parse(text, game.board())?)),
        }
        input.clear();
    }
}
