use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gamerec_core::loader::load_catalog;
use gamerec_core::{Error, Recommender, SelfExclusion, DEFAULT_K, NOT_FOUND_MESSAGE};
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gamerec")]
#[command(about = "Query the title based game recommender offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the games most similar to the one with the given id
    Recommend {
        /// Catalog CSV with `id` and `title` columns
        #[arg(long)]
        catalog: String,
        /// Id of the game to start from
        #[arg(long)]
        id: String,
        /// Number of recommendations
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
        /// Exclude the query item by dropping the top ranked row instead of by index
        #[arg(long, default_value_t = false)]
        top_rank_exclusion: bool,
        /// Emit JSON instead of the numbered message
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize the vocabulary built from a catalog
    Vocab {
        /// Catalog CSV with `id` and `title` columns
        #[arg(long)]
        catalog: String,
        /// How many of the rarest terms to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend { catalog, id, k, top_rank_exclusion, json } => {
            let exclusion = if top_rank_exclusion { SelfExclusion::TopRank } else { SelfExclusion::ById };
            recommend(&mut io::stdout().lock(), &catalog, &id, k, exclusion, json)
        }
        Commands::Vocab { catalog, limit } => vocab(&mut io::stdout().lock(), &catalog, limit),
    }
}

fn build(catalog: &str) -> Result<Recommender> {
    let items = load_catalog(Path::new(catalog)).with_context(|| format!("loading catalog {catalog}"))?;
    let recommender = Recommender::build(items)?;
    Ok(recommender)
}

/// A missing id is an answer, not a failure: the not-found message is printed and `Ok` returned.
fn recommend<W: Write>(out: &mut W, catalog: &str, id: &str, k: usize, exclusion: SelfExclusion, json: bool) -> Result<()> {
    let recommender = build(catalog)?.with_exclusion(exclusion);
    match recommender.recommend(id, k) {
        Ok(rec) if json => writeln!(out, "{}", serde_json::to_string_pretty(&rec.items)?)?,
        Ok(rec) => write!(out, "{}", rec.message())?,
        Err(Error::NotFound(_)) => writeln!(out, "{NOT_FOUND_MESSAGE}")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn vocab<W: Write>(out: &mut W, catalog: &str, limit: usize) -> Result<()> {
    let recommender = build(catalog)?;
    let model = recommender.model();
    let vocabulary = model.vocabulary();
    let degenerate = model.rows().iter().filter(|r| r.is_zero()).count();
    writeln!(out, "items: {}", recommender.catalog().len())?;
    writeln!(out, "vocabulary: {}", vocabulary.len())?;
    writeln!(out, "titles without terms: {degenerate}")?;

    let mut by_idf: Vec<(&str, f32)> = vocabulary
        .terms()
        .iter()
        .zip(model.idf())
        .map(|(t, w)| (t.as_str(), *w))
        .collect();
    by_idf.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(b.0)));
    for (term, idf) in by_idf.into_iter().take(limit) {
        writeln!(out, "{idf:>8.4}  {term}")?;
    }
    tracing::debug!(catalog, "vocabulary summary printed");
    Ok(())
}
