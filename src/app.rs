use crate::cli::{Cli, Commands};
use crate::errors::{ConfigError, ExtractError, SinkError};
use crate::extract::{CancellationToken, Extraction, Extractor, TracingObserver};
use crate::graph::{Depth, NodeId, UserRegistry};
use crate::sink;
use crate::source::{TsvSource, DEFAULT_MAX_FOLLOW};
use crate::utils::config::{self, Config};
use clap::CommandFactory;
use clap_complete::generate;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, PoisonError};

/// Exit code for runtime failures (I/O, unreadable dataset).
const EXIT_FAILURE: i32 = 1;
/// Exit code for bad invocations (invalid depth, unknown seed, missing source).
const EXIT_USAGE: i32 = 2;

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success, including an interrupted traversal whose
/// partial result was written).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    crate::utils::logging::init(cli.quiet, cli.verbose);
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            0
        }
        Commands::Id { username, source_users, source_edges, config } => {
            let cfg = match resolve_config(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{e}");
                    return EXIT_FAILURE;
                }
            };
            let source = match open_source(source_users, source_edges, &cfg) {
                Ok(s) => s,
                Err(code) => return code,
            };
            if let Some(id) = source.lookup_id(&username) {
                println!("{username} has ID {id}");
                0
            } else {
                eprintln!("No account named {username} in dataset");
                EXIT_FAILURE
            }
        }
        Commands::Graph {
            username_file,
            graph_file,
            seeds,
            depth,
            max_follow,
            source_users,
            source_edges,
            config,
            json,
            parallel,
        } => {
            let cfg = match resolve_config(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{e}");
                    return EXIT_FAILURE;
                }
            };
            let depth = depth.or_else(|| cfg.depth()).unwrap_or_default();
            let max_follow = max_follow.or_else(|| cfg.max_follow()).unwrap_or(DEFAULT_MAX_FOLLOW);
            let parallel = parallel || cfg.parallel().unwrap_or(false);

            let source = match open_source(source_users, source_edges, &cfg) {
                Ok(s) => s.with_max_follow(max_follow),
                Err(code) => return code,
            };

            // Label the seeds the way a live adapter would resolve a user ID.
            let mut seed_users = UserRegistry::new();
            for id in seeds {
                let id = NodeId::from(id);
                let Some(label) = source.label_of(&id).map(str::to_string) else {
                    eprintln!("Unable to fetch user information for seed {id}");
                    return EXIT_USAGE;
                };
                seed_users.insert(id, label);
            }

            // Open outputs before crawling so a bad path fails fast. Nothing is
            // truncated until both are open.
            let users_out = match open_output(&username_file) {
                Ok(f) => f,
                Err(code) => return code,
            };
            let edges_out = match open_output(&graph_file) {
                Ok(f) => f,
                Err(code) => return code,
            };
            for (path, file) in [(&username_file, &users_out), (&graph_file, &edges_out)] {
                if let Err(e) = file.set_len(0) {
                    eprintln!("Failed to truncate {}: {e}", path.display());
                    return EXIT_FAILURE;
                }
            }
            let (users_out, edges_out) = (BufWriter::new(users_out), BufWriter::new(edges_out));

            let token = CancellationToken::new();
            let extraction = {
                let _interrupts = InterruptGuard::route_to(&token);
                run_extraction(&source, seed_users, depth, token, parallel)
            };
            let extraction = match extraction {
                Ok(x) => x,
                Err(e) => {
                    eprintln!("{e}");
                    return EXIT_USAGE;
                }
            };

            if let Err(e) = sink::write_users(&extraction.users, users_out) {
                eprintln!("Failed to write {}: {e}", username_file.display());
                return EXIT_FAILURE;
            }
            if let Err(e) = sink::write_edges(&extraction.edges, edges_out) {
                eprintln!("Failed to write {}: {e}", graph_file.display());
                return EXIT_FAILURE;
            }
            if let Some(json_path) = json {
                let written = File::create(&json_path)
                    .map_err(SinkError::from)
                    .and_then(|f| sink::write_json(&extraction, BufWriter::new(f)));
                if let Err(e) = written {
                    eprintln!("Failed to write JSON output {}: {e}", json_path.display());
                    return EXIT_FAILURE;
                }
            }

            if !cli.quiet {
                print_summary(&extraction, depth);
            }
            0
        }
    }
}

fn run_extraction(
    source: &TsvSource,
    seeds: UserRegistry,
    depth: Depth,
    token: CancellationToken,
    parallel: bool,
) -> Result<Extraction, ExtractError> {
    let observer = TracingObserver;
    let extractor = Extractor::new(depth).with_cancellation(token).with_observer(&observer);
    if parallel {
        extractor.run_parallel(source, seeds)
    } else {
        extractor.run(source, seeds)
    }
}

fn resolve_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(p) => config::load_config_at(p),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Ok(config::load_config_near(&cwd)?.unwrap_or_default())
        }
    }
}

fn open_source(
    users: Option<PathBuf>,
    edges: Option<PathBuf>,
    cfg: &Config,
) -> Result<TsvSource, i32> {
    let users = users.or_else(|| cfg.source_users().map(Path::to_path_buf));
    let edges = edges.or_else(|| cfg.source_edges().map(Path::to_path_buf));
    let (Some(users), Some(edges)) = (users, edges) else {
        eprintln!("Missing dataset. Provide --source-users and --source-edges (or a [source] config section).");
        return Err(EXIT_USAGE);
    };
    TsvSource::open(&users, &edges).map_err(|e| {
        eprintln!("Failed to load dataset {} / {}: {e}", users.display(), edges.display());
        EXIT_FAILURE
    })
}

fn open_output(path: &Path) -> Result<File, i32> {
    OpenOptions::new().write(true).create(true).truncate(false).open(path).map_err(|e| {
        eprintln!("Failed to open {}: {e}", path.display());
        EXIT_FAILURE
    })
}

/// Exit status after a Ctrl-C outside of a traversal.
const EXIT_INTERRUPTED: i32 = 130;

static ACTIVE_TRAVERSAL: Mutex<Option<CancellationToken>> = Mutex::new(None);
static HANDLER: Once = Once::new();

/// Routes Ctrl-C to a traversal's token while alive. Outside of a traversal
/// Ctrl-C terminates the process.
struct InterruptGuard;

impl InterruptGuard {
    fn route_to(token: &CancellationToken) -> Self {
        HANDLER.call_once(|| {
            let installed = ctrlc::set_handler(|| {
                if !forward_interrupt() {
                    std::process::exit(EXIT_INTERRUPTED);
                }
            });
            if let Err(e) = installed {
                tracing::warn!(error = %e, "interrupt handler not installed");
            }
        });
        set_active(Some(token.clone()));
        InterruptGuard
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        set_active(None);
    }
}

fn set_active(token: Option<CancellationToken>) {
    let mut slot = ACTIVE_TRAVERSAL.lock().unwrap_or_else(PoisonError::into_inner);
    *slot = token;
}

/// Cancel the running traversal, if any. Returns false when none is running.
fn forward_interrupt() -> bool {
    let slot = ACTIVE_TRAVERSAL.lock().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(token) => {
            token.cancel();
            true
        }
        None => false,
    }
}

fn print_summary(extraction: &Extraction, depth: Depth) {
    if extraction.is_cancelled() {
        println!(
            "Interrupted after {} completed hop(s); partial result written.",
            extraction.completed_hops()
        );
    }
    println!("Finished: {} nodes", extraction.users.len());
    let rows = vec![
        vec!["depth".to_string(), depth.to_string()],
        vec!["hops".to_string(), extraction.completed_hops().to_string()],
        vec!["users".to_string(), extraction.users.len().to_string()],
        vec!["edges".to_string(), extraction.edges.edge_count().to_string()],
        vec!["failed fetches".to_string(), extraction.failures.len().to_string()],
    ];
    println!("{}", crate::utils::table::render(&["Metric", "Value"], &rows));
}
