use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hamlet_oracle::{
    AppContext, ModelPersistence, NextWordModel, OracleConfig, PersistentModel, SequenceModel, Vocabulary,
};

/// Next-word oracle for Shakespeare-style phrases
#[derive(Parser)]
#[command(name = "hamlet-oracle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web form and JSON API
    Serve(ServeArgs),
    /// Predict the next word for one phrase
    Predict {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        vocab: PathBuf,
        #[arg(long, default_value_t = 3)]
        top_k: usize,
        /// Phrase to continue
        text: String,
    },
    /// Print model metadata and size
    Inspect {
        #[arg(long)]
        model: PathBuf,
    },
    /// Write an untrained model shaped for a vocabulary
    InitModel {
        #[arg(long)]
        vocab: PathBuf,
        /// Output path; `.json` writes JSON, anything else bincode
        #[arg(long)]
        out: PathBuf,
        /// Token window length (model sequence length minus one)
        #[arg(long, default_value_t = 13)]
        window: usize,
        #[arg(long, default_value_t = 100)]
        embed_dim: usize,
        /// Comma separated LSTM layer widths
        #[arg(long, value_delimiter = ',', default_values_t = vec![150, 100])]
        hidden: Vec<usize>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "next_word_lstm")]
        name: String,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    bind: Option<String>,
    #[arg(long)]
    model: Option<PathBuf>,
    #[arg(long)]
    vocab: Option<PathBuf>,
    #[arg(short, long)]
    workers: Option<usize>,
}

impl ServeArgs {
    fn into_config(self) -> Result<OracleConfig> {
        let mut config = match &self.config {
            Some(path) => OracleConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => OracleConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(vocab) = self.vocab {
            config.vocab_path = vocab;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.validate()?;
        Ok(config)
    }
}

fn serve(args: ServeArgs) -> Result<()> {
    let config = args.into_config()?;
    let ctx = AppContext::load(config).context("failed to load oracle artifacts")?;
    hamlet_oracle::web::run_server(Arc::new(ctx))?;
    Ok(())
}

fn predict(model: PathBuf, vocab: PathBuf, top_k: usize, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("please enter a phrase");
    }

    let config = OracleConfig { model_path: model, vocab_path: vocab, ..OracleConfig::default() };
    let ctx = AppContext::load(config).context("failed to load oracle artifacts")?;

    let report = ctx.predictor().predict_with_candidates(text, top_k)?;
    println!("window: {:?}", report.window.as_slice());
    match report.prediction.word() {
        Some(word) => println!("next word: {}", word),
        None => println!("the oracle is confused; try another phrase"),
    }
    for candidate in &report.candidates {
        println!("  {:<20} {:.4}", candidate.word, candidate.probability);
    }
    Ok(())
}

fn inspect(path: PathBuf) -> Result<()> {
    let (model, metadata) =
        NextWordModel::load(&path).with_context(|| format!("failed to load model {}", path.display()))?;

    println!("Model: {}", metadata.model_name);
    println!("  version:      {}", metadata.version);
    println!("  created at:   {}", metadata.created_at);
    println!("  window:       {}", model.window_len());
    println!("  classes:      {}", model.output_size());
    println!("  embedding:    {}", model.embedding.embed_dim());
    println!("  lstm layers:  {:?}", model.lstm.hidden_sizes());
    println!("  parameters:   {}", model.num_parameters());
    if let Some(description) = &metadata.description {
        println!("  description:  {}", description);
    }
    Ok(())
}

fn init_model(
    vocab: PathBuf,
    out: PathBuf,
    window: usize,
    embed_dim: usize,
    hidden: Vec<usize>,
    seed: u64,
    name: String,
) -> Result<()> {
    let vocab = Vocabulary::load(&vocab).with_context(|| format!("failed to load vocabulary {}", vocab.display()))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let model = NextWordModel::new_random(vocab.len() + 1, embed_dim, &hidden, window, &mut rng)?;

    let metadata = ModelPersistence::create_metadata(
        &model,
        name,
        Some(format!("untrained, random weights (seed {})", seed)),
    );
    model.save(&out, metadata).with_context(|| format!("failed to write {}", out.display()))?;

    info!(path = %out.display(), parameters = model.num_parameters(), "wrote untrained model");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args),
        Command::Predict { model, vocab, top_k, text } => predict(model, vocab, top_k, &text),
        Command::Inspect { model } => inspect(model),
        Command::InitModel { vocab, out, window, embed_dim, hidden, seed, name } => {
            init_model(vocab, out, window, embed_dim, hidden, seed, name)
        }
    }
}
