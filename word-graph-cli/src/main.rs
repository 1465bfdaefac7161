use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use word_graph_core::WordGraph;
use word_graph_core::model::bridge::query_bridge_words;
use word_graph_core::model::generator::generate_new_text;
use word_graph_core::model::shortest_path::{shortest_paths, shortest_paths_from};
use word_graph_core::model::walk::{Walk, WalkPolicy, random_walk};

#[derive(Parser, Debug)]
#[command(name = "word-graph", about = "Query the word adjacency graph of a text")]
struct Cli {
    /// Corpus text file the graph is built from
    #[arg(long, short, global = true, env = "WORD_GRAPH_CORPUS", default_value = "text.txt")]
    corpus: PathBuf,

    /// Seed for every random choice (bridge word, walk); random if omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every word and weighted edge
    Graph,
    /// Find the bridge words from WORD1 to WORD2
    Bridge { word1: String, word2: String },
    /// Insert random bridge words into a new text
    Generate {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Shortest paths from WORD1 to WORD2, or to every word if WORD2 is omitted
    Path { word1: String, word2: Option<String> },
    /// Random walk from a random word
    Walk {
        /// unvisited-only or stop-on-repeat
        #[arg(long, default_value_t = WalkPolicy::UnvisitedOnly)]
        policy: WalkPolicy,
        /// Wait for Enter before each step ('q' stops the replay)
        #[arg(long)]
        step: bool,
        /// Directory receiving the walk log file
        #[arg(long, default_value = "Random_walk")]
        log_dir: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Build the graph once; every command only reads it
    let graph = WordGraph::from_file(&cli.corpus)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command {
        Command::Graph => {
            println!("{} words, {} edges", graph.node_count(), graph.edge_count());
            for edge in graph.edges() {
                println!("{} -> {} ({})", edge.source, edge.target, edge.weight);
            }
        }
        Command::Bridge { word1, word2 } => {
            println!("{}", query_bridge_words(&graph, &word1, &word2).message());
        }
        Command::Generate { text } => {
            let generated = generate_new_text(&graph, &text.join(" "), &mut rng);
            // Inserted bridge words are shown in brackets
            let marked: Vec<String> = generated
                .segments
                .iter()
                .map(|s| if s.inserted { format!("[{}]", s.word) } else { s.word.clone() })
                .collect();
            println!("{}", marked.join(" "));
        }
        Command::Path { word1, word2: Some(word2) } => match shortest_paths(&graph, &word1, &word2)? {
            Some(set) => {
                println!("All shortest paths from {} to {}: length {}", set.from, set.to, set.weight);
                for path in &set.paths {
                    println!("  {}", path.join(" -> "));
                }
            }
            None => println!("There is no path between {word1} and {word2}"),
        },
        Command::Path { word1, word2: None } => {
            let paths = shortest_paths_from(&graph, &word1)?;
            if paths.is_empty() {
                println!("No word is reachable from {word1}");
            }
            for (target, path) in &paths {
                println!("{target} (length {}): {}", path.weight, path.nodes.join(" -> "));
            }
        }
        Command::Walk { policy, step, log_dir } => match random_walk(&graph, policy, &mut rng) {
            Some(walk) => replay_walk(&walk, step, &log_dir)?,
            None => println!("The graph is empty, nothing to walk"),
        },
    }

    Ok(())
}

/// Replays a walk step by step, rewriting the log file with the words
/// visited so far after each step.
fn replay_walk(walk: &Walk, interactive: bool, log_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let stamp = chrono::Local::now().format("%Y-%m-%d %H.%M.%S");
    let log_path = log_dir.join(format!("Random_walk_output_{stamp}.txt"));
    log::info!("Writing walk log to {}", log_path.display());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    for snapshot in walk.snapshots() {
        if snapshot.index == 0 {
            println!("Start at {}", snapshot.node);
        } else {
            println!("Step {}: now at {} ({} edge(s) visited)", snapshot.index, snapshot.node, snapshot.visited.len());
        }
        fs::write(&log_path, walk.log_line(snapshot.index))?;

        if interactive && snapshot.index + 1 < walk.len() {
            print!("Enter for next step, q to stop: ");
            io::stdout().flush()?;
            match lines.next() {
                Some(Ok(line)) if line.trim() != "q" => {}
                _ => {
                    println!("Walk replay stopped");
                    return Ok(());
                }
            }
        }
    }

    println!("This random walk is over: {}", walk.path.join(" "));
    Ok(())
}
