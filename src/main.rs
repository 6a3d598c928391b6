use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rand::Rng;

use sigmoid_mlp::{
    draw, evaluate, load_dataset, train, Alphabet, LabeledExample, Network, PredictMode,
    RunConfig, TrainConfig,
};

#[derive(Parser, Debug)]
#[command(version, about = "Train and evaluate a from-scratch sigmoid network")]
struct Cli {
    /// level of logging details (into stderr); RUST_LOG takes precedence
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// JSON run configuration; command-line flags override its values
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a fresh network, save it, then test it
    Train(RunArgs),
    /// Load a saved model and test it
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// neurons per layer separated by commas, input layer first
    #[arg(long, value_delimiter = ',')]
    topology: Option<Vec<usize>>,

    /// learning rate, must lie in (0, 1]
    #[arg(long)]
    rate: Option<f64>,

    /// number of passes over the training set
    #[arg(long)]
    epochs: Option<usize>,

    /// training set (label followed by pixel values on each line)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// testing set, same format as the training set
    #[arg(long)]
    test_dataset: Option<PathBuf>,

    /// model file to write (train) or read (run)
    #[arg(long)]
    model: Option<PathBuf>,

    /// class labels used by the dataset
    #[arg(long, value_enum)]
    alphabet: Option<Alphabet>,
}

impl RunArgs {
    fn apply(self, config: &mut RunConfig) {
        if let Some(topology) = self.topology {
            config.topology = topology;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if self.dataset.is_some() {
            config.dataset_path = self.dataset;
        }
        if self.test_dataset.is_some() {
            config.test_dataset_path = self.test_dataset;
        }
        if self.model.is_some() {
            config.model_path = self.model;
        }
        if let Some(alphabet) = self.alphabet {
            config.alphabet = alphabet;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "off,sigmoid_mlp=error",
            LogLevel::Warn => "off,sigmoid_mlp=warn",
            LogLevel::Info => "off,sigmoid_mlp=info",
            LogLevel::Debug => "off,sigmoid_mlp=debug",
            LogLevel::Trace => "off,sigmoid_mlp=trace",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.filter()))
        .init();

    let mut config = match &cli.config {
        Some(path) => RunConfig::load_json(path).with_context(|| format!("reading config {path}"))?,
        None => RunConfig::default(),
    };

    match cli.command {
        Command::Train(args) => {
            args.apply(&mut config);
            config.validate()?;
            run_training(&config)
        }
        Command::Run(args) => {
            args.apply(&mut config);
            config.validate()?;
            run_model(&config)
        }
    }
}

fn run_training(config: &RunConfig) -> Result<()> {
    let Some(dataset_path) = &config.dataset_path else {
        bail!("a training set is required (--dataset or \"dataset_path\")");
    };

    let set = load_dataset(dataset_path, config.alphabet)
        .with_context(|| format!("loading training set {}", dataset_path.display()))?;

    let mut network = Network::new(&config.topology, config.rate)?;
    train(&mut network, &set, &TrainConfig::new(config.epochs))?;

    let model_path = config.model_path.clone().unwrap_or_else(default_model_path);
    network
        .save_model(&model_path)
        .with_context(|| format!("saving model {}", model_path.display()))?;
    println!("model filename: {}", model_path.display());

    match &config.test_dataset_path {
        Some(test_path) => test_network(&network, test_path, config.alphabet),
        None => {
            warn!("no testing set given, skipping accuracy check");
            Ok(())
        }
    }
}

fn run_model(config: &RunConfig) -> Result<()> {
    let Some(model_path) = &config.model_path else {
        bail!("a model file is required (--model or \"model_path\")");
    };
    let Some(test_path) = &config.test_dataset_path else {
        bail!("a testing set is required (--test-dataset or \"test_dataset_path\")");
    };

    let mut network = Network::new(&config.topology, config.rate)?;
    network
        .load_model(model_path)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    test_network(&network, test_path, config.alphabet)
}

/// Reports accuracy on the testing set, then predicts and draws one random
/// sample from it.
fn test_network(network: &Network, test_path: &Path, alphabet: Alphabet) -> Result<()> {
    let test = load_dataset(test_path, alphabet)
        .with_context(|| format!("loading testing set {}", test_path.display()))?;
    let labels = alphabet.labels();

    let evaluation = evaluate(network, &test, &labels)?;
    println!("accuracy: {}%", evaluation.percent());

    info!("predicting random test sample...");
    let sample = &test[rand::thread_rng().gen_range(0..test.len())];
    print_prediction(network, sample, &labels)
}

fn print_prediction(network: &Network, sample: &LabeledExample, labels: &[char]) -> Result<()> {
    let prediction = network.predict(sample.inputs(), labels, PredictMode::Normalized)?;
    if let (Some(label), Some(percent)) = (prediction.label(), prediction.probability_percent()) {
        println!("prediction: {label} ({percent}%), expected: {}", sample.label_normalized);
    }
    println!("{}", draw(sample.inputs()));
    Ok(())
}

fn default_model_path() -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    PathBuf::from(format!("model_{millis}.json"))
}
