use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use monopoly::agent;
use monopoly::{Board, Game, GameConfig, RandomDice};

#[derive(Parser, Debug)]
#[command(about = "Computer players play a game against each other")]
struct Args {
    /// Number of players.
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Seed for the dice; random if omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many commands.
    #[arg(long, default_value_t = 20_000)]
    max_commands: usize,

    /// 0 never spends money, anything higher buys and builds.
    #[arg(short, long, default_value_t = 1)]
    difficulty: usize,

    /// Rule overrides in TOML.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Print every event as it happens.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };
    let names: Vec<String> = (1..=args.players).map(|i| format!("Bot {}", i)).collect();
    let mut game = Game::new(Board::standard(), &names[..], config)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut dice = RandomDice(rng);

    let notices = game.subscribe();
    let ai = agent::create_agent(args.difficulty);
    let mut commands = 0;
    while game.winner().is_none() && commands < args.max_commands {
        let command = ai.choose_command(&game);
        game.execute(command, &mut dice)?;
        commands += 1;
        for notice in notices.try_iter() {
            if args.verbose {
                println!("{}", notice.message);
            }
        }
    }

    match game.winner() {
        Some(winner) => println!(
            "{} won after {} commands.",
            game.player(winner).name,
            commands
        ),
        None => println!("No winner after {} commands.", commands),
    }
    print!("{}", game);
    Ok(())
}
