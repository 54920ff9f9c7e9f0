use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use test_discovery_core::cli;
use test_discovery_core::discovery::{discover, Root};
use test_discovery_core::logging::{self, Verbosity};
use test_discovery_core::model::ElementRegistry;
use test_discovery_core::output::TreeFormatter;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    args.validate().context("Invalid arguments")?;

    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let registry = ElementRegistry::from_path(&args.model)
        .with_context(|| format!("Failed to load model: {}", args.model.display()))?;
    let selectors = args.parse_selectors()?;

    let tree = discover(&registry, &args.engine_id, &args.engine_name, &selectors)
        .context("Discovery failed")?;

    let mut root = Root::new();
    root.add(tree);
    if !args.no_prune {
        root.prune();
    }

    for tree in root.trees() {
        let rendered = TreeFormatter::format(tree, args.format)?;
        println!("{rendered}");
    }

    Ok(())
}
