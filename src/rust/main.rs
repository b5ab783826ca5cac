use aspectra::classifier::dataset;
use aspectra::{
    Classifier, ClassifierConfig, ModelStore, ParsedSentence, Pipeline, PipelineConfig,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with dependency-parsed sentences
    #[arg(short, long)]
    sentences: PathBuf,

    /// Labeled training phrases (.csv with text,label rows or .json)
    #[arg(short, long)]
    training: Option<PathBuf>,

    /// Load a previously saved model instead of training
    #[arg(long, conflicts_with = "training")]
    load_model: Option<String>,

    /// Save the trained model under this name
    #[arg(long)]
    save_model: Option<String>,

    /// Additive smoothing constant
    #[arg(long, default_value_t = 1.0)]
    smoothing: f64,

    /// Emit records for sentences without a description
    #[arg(long)]
    keep_empty: bool,

    /// Process sentences in parallel
    #[arg(long)]
    parallel: bool,
}

fn obtain_classifier(args: &Args) -> Result<Classifier> {
    if let Some(name) = &args.load_model {
        let store = ModelStore::new_default()?;
        return store
            .load(name)
            .with_context(|| format!("Failed to load model '{}'", name));
    }

    let Some(path) = &args.training else {
        bail!("Either --training or --load-model must be given");
    };
    let examples = dataset::load_examples(path)
        .with_context(|| format!("Failed to read training data from {:?}", path))?;
    let config = ClassifierConfig::default().with_smoothing(args.smoothing);
    let classifier = Classifier::train_with_config(examples, config)?;

    if let Some(name) = &args.save_model {
        let store = ModelStore::new_default()?;
        let path = store.save(name, &classifier)?;
        info!("Saved model '{}' to {:?}", name, path);
    }
    Ok(classifier)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Aspect Sentiment Analysis ===");
    let start_time = Instant::now();

    let classifier = obtain_classifier(&args)?;
    let classifier_info = classifier.info();
    info!(
        "Classifier ready: labels {:?}, vocabulary of {} words",
        classifier_info.labels, classifier_info.vocabulary_size
    );
    for feature in classifier.most_informative_features(5) {
        info!(
            "  {:>16}: {} : {} = {:.1} : 1",
            feature.word, feature.favored, feature.disfavored, feature.ratio
        );
    }

    let file = File::open(&args.sentences)
        .with_context(|| format!("Failed to open {:?}", args.sentences))?;
    let sentences: Vec<ParsedSentence> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse sentences from {:?}", args.sentences))?;

    let config = PipelineConfig::default()
        .with_keep_empty(args.keep_empty)
        .with_parallel(args.parallel);
    let pipeline = Pipeline::with_config(classifier, config);
    let records = pipeline.analyze(&sentences)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }

    info!("=== Done: {} records in {:.2?} ===", records.len(), start_time.elapsed());
    Ok(())
}
