use blackjack::{format_cards, PayoutRatio, Table, TableRules};
use clap::Parser;
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "table-cli", about = "Play blackjack rounds against the dealer in the terminal")]
struct Args {
    /// Use a preset: default, classic, single_hand
    #[arg(long, env = "BLACKJACK_PRESET", default_value = "default")]
    preset: String,

    /// Seed for a reproducible shuffle
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Chips at the start of the game
    #[arg(long, env = "BLACKJACK_STARTING_CHIPS")]
    starting_chips: Option<u64>,

    #[arg(long, env = "BLACKJACK_MIN_BET")]
    min_bet: Option<u64>,

    #[arg(long, env = "BLACKJACK_MAX_BET")]
    max_bet: Option<u64>,

    /// Dealer draws while at or below this total
    #[arg(long)]
    dealer_hit_limit: Option<u8>,

    /// Blackjack payout ratio (e.g. "3:2", "6:5")
    #[arg(long)]
    blackjack_payout: Option<String>,

    /// Bet for the opening round (defaults to the table minimum)
    #[arg(long)]
    bet: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let rules = match build_rules(&args) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let table = match args.seed {
        Some(seed) => Table::with_seed(rules, seed),
        None => Table::new(rules),
    };
    let mut table = match table {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Invalid table configuration: {e}");
            std::process::exit(1);
        }
    };

    let opening_bet = args.bet.unwrap_or(rules.min_bet);
    if let Err(e) = table.start_game(opening_bet) {
        eprintln!("Could not deal: {e}");
        std::process::exit(1);
    }
    print_table(&table);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read input: {e}");
                break;
            }
        }

        let mut words = line.split_whitespace();
        let result = match words.next() {
            Some("h") | Some("hit") => table.hit().map(|_| ()),
            Some("s") | Some("stand") => table.stand(),
            Some("d") | Some("double") => table.double_down().map(|_| ()),
            Some("p") | Some("split") => table.split(),
            Some("n") | Some("next") => {
                let bet = match words.next().map(str::parse::<u64>) {
                    Some(Ok(bet)) => bet,
                    Some(Err(_)) => {
                        eprintln!("Bet must be a whole number of chips");
                        continue;
                    }
                    None => table.rules().min_bet,
                };
                table.deal_next_round(bet)
            }
            Some("q") | Some("quit") => break,
            Some(_) | None => {
                println!("Commands: (h)it, (s)tand, (d)ouble, s(p)lit, (n)ext [bet], (q)uit");
                continue;
            }
        };

        match result {
            Ok(()) => print_table(&table),
            Err(e) => eprintln!("{e}"),
        }
    }

    println!("Leaving the table with {} chips", table.chip_balance());
}

fn build_rules(args: &Args) -> Result<TableRules, String> {
    let mut rules = match args.preset.as_str() {
        "default" => TableRules::default(),
        "classic" => TableRules::classic(),
        "single_hand" => TableRules::single_hand(),
        other => {
            return Err(format!(
                "Unknown preset '{other}'. Available: default, classic, single_hand"
            ))
        }
    };

    if let Some(chips) = args.starting_chips {
        rules.starting_chips = chips;
    }
    if let Some(min_bet) = args.min_bet {
        rules.min_bet = min_bet;
    }
    if let Some(max_bet) = args.max_bet {
        rules.max_bet = max_bet;
    }
    if let Some(limit) = args.dealer_hit_limit {
        rules.dealer_hit_limit = limit;
    }
    if let Some(payout) = &args.blackjack_payout {
        rules.blackjack_payout = parse_payout(payout)?;
    }

    rules.validate().map_err(|e| e.to_string())?;
    Ok(rules)
}

fn parse_payout(s: &str) -> Result<PayoutRatio, String> {
    let (num, den) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid payout ratio '{s}', expected N:D (e.g. 3:2)"))?;
    let num: u16 = num
        .parse()
        .map_err(|_| format!("Invalid numerator in payout ratio '{s}'"))?;
    let den: u16 = den
        .parse()
        .map_err(|_| format!("Invalid denominator in payout ratio '{s}'"))?;
    PayoutRatio::new(num, den).map_err(|e| e.to_string())
}

fn print_table(table: &Table) {
    println!();
    println!(
        "Dealer: {} ({})",
        format_cards(table.dealer_hand()),
        table.round().dealer_value()
    );
    for (i, hand) in table.player_hands().iter().enumerate() {
        let marker = if i == table.active_hand_index() && !table.is_round_terminal() {
            "*"
        } else {
            " "
        };
        println!(
            "{marker}Hand {}: {} ({}) bet {}",
            i + 1,
            format_cards(&hand.cards),
            hand.value(),
            hand.bet
        );
    }
    println!("Chips: {}  Deck: {}", table.chip_balance(), table.deck_len());

    if let Some(message) = table.outcome_message() {
        println!("{message}");
        println!("(n)ext [bet] to play another round, (q)uit to leave");
    } else {
        let mut options = vec!["(h)it", "(s)tand"];
        if table.can_double() {
            options.push("(d)ouble");
        }
        if table.can_split() {
            options.push("s(p)lit");
        }
        println!("{}", options.join(", "));
    }
}
