use amazing_core::{LifeConfig, MazeAlgorithm, Rules};
use host::{
    generate_maze_report, load_life, load_maze_report, render_maze, save_life, save_maze_report, LifeSession,
};
use std::env;
use std::time::Instant;

/// Seed used when `--seed` is not given
const DEFAULT_SEED: u32 = 2918957128;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("🧩 Maze & Life Engine");
    println!("{}", "=".repeat(70));
    println!();

    // Parse CLI arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "generate-maze" => {
            if args.len() < 4 {
                eprintln!(
                    "Usage: {} generate-maze <width> <height> [--algorithm kruskal|dfs] [--seed <n>] [output_file]",
                    args[0]
                );
                std::process::exit(1);
            }

            let width = parse_number::<usize>(&args[2], "width");
            let height = parse_number::<usize>(&args[3], "height");

            let mut algorithm = MazeAlgorithm::default();
            let mut seed = DEFAULT_SEED;
            let mut output_file = None;

            let mut i = 4;
            while i < args.len() {
                match args[i].as_str() {
                    "--algorithm" => {
                        let value = flag_value(&args, i, "--algorithm", "kruskal|dfs");
                        algorithm = value.parse().unwrap_or_else(|e| fail(e));
                        i += 2;
                    }
                    "--seed" => {
                        seed = parse_number(flag_value(&args, i, "--seed", "an integer"), "seed");
                        i += 2;
                    }
                    other => {
                        output_file = Some(other);
                        i += 1;
                    }
                }
            }

            generate_maze_command(width, height, algorithm, seed, output_file);
        }

        "run-life" => {
            if args.len() < 5 {
                eprintln!(
                    "Usage: {} run-life <width> <height> <generations> [--seed <n>] [--rules <B/S>] [--light] [--resume <file>] [--save <file>]",
                    args[0]
                );
                std::process::exit(1);
            }

            let width = parse_number::<usize>(&args[2], "width");
            let height = parse_number::<usize>(&args[3], "height");
            let generations = parse_number::<u32>(&args[4], "generations");

            let mut options = LifeOptions {
                seed: None,
                rules: None,
                light: false,
                resume: None,
                save: None,
            };

            let mut i = 5;
            while i < args.len() {
                match args[i].as_str() {
                    "--seed" => {
                        options.seed = Some(parse_number(flag_value(&args, i, "--seed", "an integer"), "seed"));
                        i += 2;
                    }
                    "--rules" => {
                        let value = flag_value(&args, i, "--rules", "B/S notation, e.g. B3/S23");
                        options.rules = Some(value.parse().unwrap_or_else(|e| fail(e)));
                        i += 2;
                    }
                    "--light" => {
                        options.light = true;
                        i += 1;
                    }
                    "--resume" => {
                        options.resume = Some(flag_value(&args, i, "--resume", "a file"));
                        i += 2;
                    }
                    "--save" => {
                        options.save = Some(flag_value(&args, i, "--save", "a file"));
                        i += 2;
                    }
                    other => {
                        eprintln!("❌ Error: Unknown option '{}'", other);
                        std::process::exit(1);
                    }
                }
            }

            if let Err(e) = options.check() {
                fail(e);
            }

            run_life_command(width, height, generations, options);
        }

        "show-maze" => {
            if args.len() < 3 {
                eprintln!("Usage: {} show-maze <maze_file>", args[0]);
                eprintln!("Error: Missing required argument");
                std::process::exit(1);
            }

            show_maze_command(&args[2]);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

struct LifeOptions<'a> {
    seed: Option<u32>,
    rules: Option<Rules>,
    light: bool,
    resume: Option<&'a str>,
    save: Option<&'a str>,
}

impl LifeOptions<'_> {
    /// A resumed session keeps the seed, rules and seeding it was saved with
    fn check(&self) -> Result<(), String> {
        if self.resume.is_none() {
            return Ok(());
        }
        let conflicts: Vec<&str> = [
            (self.seed.is_some(), "--seed"),
            (self.rules.is_some(), "--rules"),
            (self.light, "--light"),
        ]
        .into_iter()
        .filter(|&(set, _)| set)
        .map(|(_, flag)| flag)
        .collect();

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(format!("{} cannot be combined with --resume", conflicts.join(", ")))
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate-maze <width> <height> [--algorithm kruskal|dfs] [--seed <n>] [output_file]");
    eprintln!("      Generate a perfect maze and save it");
    eprintln!("      - width, height: Size in cells (at least 2 each)");
    eprintln!("      - --algorithm: kruskal (default) or dfs");
    eprintln!("      - --seed: Integer seed, default {}", DEFAULT_SEED);
    eprintln!("      - output_file: Optional file to save the maze (JSON)");
    eprintln!("                     Defaults to: <seed>_<algorithm>_maze.json");
    eprintln!();
    eprintln!("  run-life <width> <height> <generations> [--seed <n>] [--rules <B/S>] [--light] [--resume <file>] [--save <file>]");
    eprintln!("      Run the background automaton and print the final board");
    eprintln!("      - width, height: Board size in cells (at least 3 each)");
    eprintln!("      - generations: Number of generations to step");
    eprintln!("      - --rules: Rule notation, default B3/S1234");
    eprintln!("      - --light: Fewer seed cells and a flat 200-generation budget");
    eprintln!("      - --resume: Continue from a saved session");
    eprintln!("                  Size arguments are ignored; --seed, --rules and --light are rejected");
    eprintln!("      - --save: Save the session afterwards (JSON)");
    eprintln!();
    eprintln!("  show-maze <maze_file>");
    eprintln!("      Load a saved maze and print it");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Generate maze:  {} generate-maze 20 12 --algorithm dfs --seed 42", program);
    eprintln!("     (saves to 42_dfs_maze.json)");
    eprintln!("  2. Print it again: {} show-maze 42_dfs_maze.json", program);
    eprintln!("  3. Run life:       {} run-life 64 32 500 --save life.json", program);
    eprintln!("  4. Keep going:     {} run-life 0 0 500 --resume life.json --save life.json", program);
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("❌ Error: {}", e);
    std::process::exit(1);
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("❌ Error: Invalid {} '{}'. Must be a non-negative integer.", what, value);
        std::process::exit(1);
    })
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str, expected: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("❌ Error: {} requires a value ({})", flag, expected);
            std::process::exit(1);
        }
    }
}

fn generate_maze_command(width: usize, height: usize, algorithm: MazeAlgorithm, seed: u32, output_file: Option<&str>) {
    println!("📋 Generating maze");
    println!("  Size: {}x{} cells", width, height);
    println!("  Algorithm: {}", algorithm);
    println!("  Seed: {}", seed);
    println!();

    let start = Instant::now();

    match generate_maze_report(width, height, algorithm, seed) {
        Ok(report) => {
            let duration = start.elapsed();
            println!("  Generation time: {:.3}s", duration.as_secs_f64());
            println!();

            match report.to_maze() {
                Ok(maze) => print!("{}", render_maze(&maze)),
                Err(e) => fail(e),
            }
            println!();
            println!("✅ Maze generated successfully!");
            println!("  Walls standing: {}", report.walls.len());
            println!("  Passages: {}", report.passages);
            println!("  Snapshot size: {} bytes", report.snapshot.len());
            println!();

            // Use default filename pattern if no output file specified
            let default_filename = format!("{}_{}_maze.json", seed, algorithm);
            let file_to_save = output_file.unwrap_or(&default_filename);

            match save_maze_report(&report, file_to_save) {
                Ok(_) => {
                    println!("💾 Maze saved to: {}", file_to_save);
                    println!("   Use 'show-maze {}' to print it again", file_to_save);
                }
                Err(e) => {
                    eprintln!("❌ Error saving maze: {}", e);
                    std::process::exit(1);
                }
            }

            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error generating maze: {}", e);
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn run_life_command(width: usize, height: usize, generations: u32, options: LifeOptions<'_>) {
    let session = match options.resume {
        Some(path) => {
            println!("📦 Resuming session from: {}", path);
            let resumed = load_life(path).and_then(|save| LifeSession::resume(&save));
            match resumed {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("❌ Error loading session: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let mut config = if options.light { LifeConfig::light() } else { LifeConfig::default() };
            if let Some(rules) = options.rules {
                config.rules = rules;
            }

            println!("📋 Starting simulation");
            println!("  Size: {}x{} cells", width, height);
            println!("  Rules: {}", config.rules);
            let seed = options.seed.unwrap_or(DEFAULT_SEED);
            println!("  Seed: {}", seed);
            println!();

            match LifeSession::new(width, height, config, seed) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("❌ Error starting simulation: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    println!("⚙️  Stepping {} generations...", generations);
    let start = Instant::now();

    let restarts = match session.run(generations) {
        Ok(restarts) => restarts,
        Err(e) => fail(e),
    };

    let duration = start.elapsed();
    println!("  Step time: {:.3}s", duration.as_secs_f64());
    println!();

    match session.render_ascii() {
        Ok(text) => print!("{}", text),
        Err(e) => fail(e),
    }
    println!();
    println!("✅ Simulation finished");
    println!("  Generation: {}", session.generation().unwrap_or_else(|e| fail(e)));
    println!("  Population: {}", session.population().unwrap_or_else(|e| fail(e)));
    println!("  Restarts: {}", restarts);
    println!();

    if let Some(path) = options.save {
        match session.save().and_then(|save| save_life(&save, path)) {
            Ok(_) => {
                println!("💾 Session saved to: {}", path);
                println!("   Use '--resume {}' to continue it", path);
            }
            Err(e) => {
                eprintln!("❌ Error saving session: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("{}", "=".repeat(70));
}

fn show_maze_command(maze_file: &str) {
    println!("📋 Loading maze");
    println!("  Maze file: {}", maze_file);
    println!();

    let report = match load_maze_report(maze_file) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Error loading maze: {}", e);
            std::process::exit(1);
        }
    };

    let maze = match report.to_maze() {
        Ok(maze) => maze,
        Err(e) => {
            eprintln!("❌ Error decoding maze: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "📦 Loaded {}x{} {} maze (seed: {})",
        report.width, report.height, report.algorithm, report.seed
    );
    println!();
    print!("{}", render_maze(&maze));
    println!("{}", "=".repeat(70));
}
