use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use petiscore_ai::{ClaudeScorer, DEFAULT_MODEL, HeuristicScorer, Scorer};
use petiscore_store::Workspace;

mod collect;
mod fetch;
mod report;
mod score;

#[derive(Parser)]
#[command(
    name = "petiscore",
    version,
    about = "Score legal petitions and calibrate the scorer against customer ratings"
)]
struct Cli {
    /// Workspace directory holding data/, petitions/, and results/.
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query the operations database for rated petitions.
    Collect {
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
        /// Cap on gold-standard (rating 5) petitions.
        #[arg(long, default_value_t = 15)]
        gold_limit: i64,
        /// Cap on low-rating (1-3) petitions.
        #[arg(long, default_value_t = 12)]
        low_limit: i64,
    },
    /// Download the collected documents and extract their text.
    Fetch,
    /// Score every processed petition and persist the evaluations.
    Score {
        #[arg(long, value_enum, default_value_t = ScorerKind::Heuristic)]
        scorer: ScorerKind,
        #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },
    /// Score one extracted text file and print the evaluation JSON.
    ScoreOne {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ScorerKind::Heuristic)]
        scorer: ScorerKind,
        #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },
    /// Print the calibration report and persist the summary.
    Report,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScorerKind {
    Heuristic,
    Claude,
}

fn build_scorer(
    kind: ScorerKind,
    api_key: Option<String>,
    model: String,
) -> anyhow::Result<Box<dyn Scorer>> {
    match kind {
        ScorerKind::Heuristic => Ok(Box::new(HeuristicScorer::new())),
        ScorerKind::Claude => {
            let api_key = api_key
                .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY is required for --scorer claude"))?;
            Ok(Box::new(ClaudeScorer::new(api_key, model)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let workspace = Workspace::new(&cli.dir);

    match cli.command {
        Command::Collect {
            database_url,
            gold_limit,
            low_limit,
        } => collect::run(&workspace, &database_url, gold_limit, low_limit).await,
        Command::Fetch => fetch::run(&workspace).await,
        Command::Score {
            scorer,
            api_key,
            model,
        } => {
            let scorer = build_scorer(scorer, api_key, model)?;
            score::run(&workspace, scorer.as_ref()).await
        }
        Command::ScoreOne {
            file,
            scorer,
            api_key,
            model,
        } => {
            let scorer = build_scorer(scorer, api_key, model)?;
            score::run_one(&file, scorer.as_ref()).await
        }
        Command::Report => report::run(&workspace),
    }
}
