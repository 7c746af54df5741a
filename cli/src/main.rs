use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moviedex_core::corpus::{load_documents, load_stop_words};
use moviedex_core::persist::{load_index, save_index};
use moviedex_core::{
    DocId, InvertedIndex, QueryEngine, Scorer, Settings, Tokenizer, TokenizerConfig,
    DEFAULT_MAX_RESULTS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "moviedex")]
#[command(about = "Keyword search over a movie corpus", long_about = None)]
struct Cli {
    /// Directory holding movies.json and stopwords.txt
    #[arg(long, env = "MOVIEDEX_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,
    /// Directory the index snapshot is written to and read from
    #[arg(long, env = "MOVIEDEX_CACHE_DIR", default_value = "cache", global = true)]
    cache_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inverted index and save it to the cache directory
    Build,
    /// Find movies matching any query keyword
    Search {
        query: String,
        /// Maximum number of results
        #[arg(default_value_t = DEFAULT_MAX_RESULTS)]
        limit: usize,
        /// Rank by TF-IDF instead of query keyword order
        #[arg(long, default_value_t = false)]
        ranked: bool,
    },
    /// Occurrences of a term in one movie
    Tf { doc_id: DocId, term: String },
    /// Smoothed inverse document frequency of a term
    Idf { term: String },
    /// TF-IDF score of a term in one movie
    Tfidf { doc_id: DocId, term: String },
}

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::new(&cli.data_dir, &cli.cache_dir);
    match cli.command {
        Commands::Build => build(&settings),
        Commands::Search { query, limit, ranked } => {
            let index = open_index(&settings)?;
            let engine = QueryEngine::new(&index);
            if ranked {
                for (rank, hit) in engine.search_ranked(&query, limit)?.iter().enumerate() {
                    println!(
                        "{}. {} (id {}) score {:.4}",
                        rank + 1,
                        hit.document.title,
                        hit.document.id,
                        hit.score
                    );
                }
            } else {
                for (rank, doc) in engine.search(&query, limit)?.iter().enumerate() {
                    println!("{}. {} (id {})", rank + 1, doc.title, doc.id);
                }
            }
            Ok(())
        }
        Commands::Tf { doc_id, term } => {
            let index = open_index(&settings)?;
            println!("{}", index.get_term_frequency(doc_id, &term)?);
            Ok(())
        }
        Commands::Idf { term } => {
            let index = open_index(&settings)?;
            let idf = index.get_inverse_document_frequency(&term)?;
            println!("Inverse document frequency of '{term}': {idf:.2}");
            Ok(())
        }
        Commands::Tfidf { doc_id, term } => {
            let index = open_index(&settings)?;
            let score = Scorer::new(&index).tf_idf(doc_id, &term)?;
            println!("TF-IDF score of '{term}' in document {doc_id}: {score:.2}");
            Ok(())
        }
    }
}

fn build(settings: &Settings) -> Result<()> {
    let tokenizer = load_tokenizer(settings)?;
    let documents = load_documents(&settings.movies_path())?;
    let index = InvertedIndex::build(tokenizer, documents);
    let paths = settings.index_paths();
    save_index(&paths, index.state())
        .with_context(|| format!("saving index to {}", paths.root.display()))?;
    tracing::info!(cache_dir = %paths.root.display(), "index build complete");
    Ok(())
}

fn open_index(settings: &Settings) -> Result<InvertedIndex> {
    let tokenizer = load_tokenizer(settings)?;
    let state = load_index(&settings.index_paths())?;
    Ok(InvertedIndex::from_state(tokenizer, state))
}

fn load_tokenizer(settings: &Settings) -> Result<Arc<Tokenizer>> {
    let stop_words = load_stop_words(&settings.stop_words_path())?;
    let config = TokenizerConfig { stop_words, ..TokenizerConfig::default() };
    Ok(Arc::new(Tokenizer::new(config)))
}
