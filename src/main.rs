use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use strum::{EnumMessage, IntoEnumIterator};

use mltoolkit::classifiers::config::parameters_schema;
use mltoolkit::classifiers::{Classifier, ClassifierModel, ClassifierType};
use mltoolkit::core::Signature;
use mltoolkit::evaluation::Snapshot;
use mltoolkit::registry::ClassifierRegistry;
use mltoolkit::streams::ArffDataset;
use mltoolkit::tasks::{PrequentialEvaluator, evaluate_holdout, split_holdout};
use mltoolkit::ui::cli::args::{Cli, Command, DescribeArgs, EvaluateArgs, PredictArgs};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate(args) => evaluate(args),
        Command::Predict(args) => predict(args),
        Command::Describe(args) => describe(args),
    }
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let kind = args.classifier_type()?;
    let config = args.config();
    let dataset = load_dataset(&args.train, args.class_index)?;
    let (signature, instances) = dataset.into_parts();

    let mut model = ClassifierModel::new(kind, signature.clone(), &config)
        .with_context(|| format!("failed to construct {kind} classifier"))?;

    if args.prequential {
        print_header(&format!("Prequential evaluation of {kind}"), instances.len());
        let online = model
            .as_online()
            .ok_or_else(|| anyhow!("{kind} cannot learn online; drop --prequential"))?;
        let mut runner = PrequentialEvaluator::new(online, None, args.sample_frequency)
            .context("failed to construct PrequentialEvaluator")?;
        runner.run(&instances).context("prequential run failed")?;
        for snapshot in runner.curve() {
            println!("{}", format_status(snapshot));
        }
    } else {
        let (train, test) = match (&args.test, args.holdout) {
            (Some(path), _) => {
                let test = load_dataset(path, args.class_index)?;
                if test.signature() != &signature {
                    bail!(
                        "{} does not share the attributes of {}",
                        path.display(),
                        args.train.display()
                    );
                }
                (instances, test.into_parts().1)
            }
            (None, Some(fraction)) => {
                split_holdout(&instances, fraction, args.seed).context("invalid --holdout")?
            }
            (None, None) => (instances.clone(), instances),
        };
        print_header(&format!("Holdout evaluation of {kind}"), train.len());
        let snapshot =
            evaluate_holdout(&mut model, &train, &test).context("holdout evaluation failed")?;
        println!("{}", format_status(&snapshot));
    }

    if args.info {
        println!("{FG_GREY}{}{RESET}", model.classifier_info());
    }

    if let (Some(path), Some(name)) = (&args.save, &args.name) {
        save_model(path, name, model)?;
        println!("{DIM}saved '{name}' to {}{RESET}", path.display());
    }
    Ok(())
}

fn predict(args: PredictArgs) -> Result<()> {
    let registry = ClassifierRegistry::load_from_path(&args.registry)
        .with_context(|| format!("failed to load registry {}", args.registry.display()))?;
    let model = registry
        .get_classifier(&args.name)
        .ok_or_else(|| anyhow!("no classifier named '{}'", args.name))?;

    let dataset = load_dataset(&args.data, args.class_index)?;
    ensure_same_signature(model.signature(), dataset.signature())?;

    for (row, unlabelled) in dataset.unlabelled_instances().iter().enumerate() {
        let label = model
            .classify(unlabelled)
            .with_context(|| format!("failed to classify row {}", row + 1))?;
        println!("{label}");
    }
    Ok(())
}

fn describe(args: DescribeArgs) -> Result<()> {
    let only = args.classifier_type()?;
    for kind in ClassifierType::iter().filter(|k| only.is_none_or(|o| o == *k)) {
        println!(
            "{BOLD}{FG_CYAN}{}{RESET} {DIM}({}, {kind}){RESET}",
            kind.get_message().unwrap_or_default(),
            kind.code()
        );
        if let Some(detail) = kind.get_detailed_message() {
            println!("  {detail}");
        }
        if let Some(schema) = parameters_schema(kind) {
            let pretty = serde_json::to_string_pretty(&schema)?;
            for line in pretty.lines() {
                println!("  {FG_GREY}{line}{RESET}");
            }
        }
    }
    Ok(())
}

fn load_dataset(path: &Path, class_index: Option<usize>) -> Result<ArffDataset> {
    ArffDataset::from_path(path, class_index)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn ensure_same_signature(expected: &Signature, found: &Signature) -> Result<()> {
    if expected != found {
        bail!("data attributes do not match the classifier:\nexpected {expected}\nfound {found}");
    }
    Ok(())
}

fn save_model(path: &Path, name: &str, model: ClassifierModel) -> Result<()> {
    let mut registry = if path.exists() {
        ClassifierRegistry::load_from_path(path)
            .with_context(|| format!("failed to load registry {}", path.display()))?
    } else {
        ClassifierRegistry::new()
    };
    // saving under an existing name replaces it
    registry.remove_classifier(name);
    registry.insert(name, model)?;
    registry
        .save_to_path(path)
        .with_context(|| format!("failed to save registry {}", path.display()))
}

fn print_header(title: &str, instances: usize) {
    println!("{BOLD}{FG_CYAN}▶ {title}{RESET}");
    println!("{DIM}instances={instances}{RESET}  {}", timestamp_now());
    println!(
        "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
    );
}

fn format_status(s: &Snapshot) -> String {
    let mut line = format!("{FG_GREEN}{BOLD}seen{RESET} {:>9}", s.instances_seen);
    if !s.accuracy.is_nan() {
        line.push_str(&format!(
            "  {FG_CYAN}{BOLD}acc{RESET} {:>7}%  {FG_MAGENTA}{BOLD}κ{RESET} {:>7}%",
            fmtf(s.accuracy * 100.0, 3),
            fmtf(s.kappa * 100.0, 3)
        ));
    }
    for (name, value) in &s.extras {
        line.push_str(&format!("  {DIM}{name}{RESET} {}", fmtf(*value, 6)));
    }
    line.push_str(&format!("  {DIM}t{RESET} {:.6}s", s.seconds));
    line
}

fn fmtf(x: f64, prec: usize) -> String {
    if x.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{:>1$.prec$}", x, 6, prec = prec)
    }
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}

