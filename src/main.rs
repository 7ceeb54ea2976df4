use clap::Parser;
use std::path::PathBuf;
use strand_align::config::StrandConfig;
use strand_align::pipeline;
use tracing::{error, info};

/// STRAND: mines parallel bilingual text from paired HTML web pages.
///
/// Reads a gzip-compressed, tab-separated input of clustered webpages (one
/// cluster key followed by repeating `language\turl\thtml` groups), aligns
/// each cross-language pair structurally and at the sentence level, and
/// writes `.src`/`.tgt`/`.annotation`/`.bi` files per language pair.
#[derive(Parser, Debug)]
#[command(name = "strand-align", version, about)]
struct Cli {
    /// Gzip-compressed TSV input file.
    input: PathBuf,

    /// Output path prefix; per-language-pair suffixes are appended
    /// (e.g. `out.en-fr.src`, `out.en-fr.annotation`).
    output_prefix: PathBuf,

    /// Path to a `strand-align.json` config file. Defaults to
    /// `strand-align.json` in the current directory if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    strand_align::logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StrandConfig::load_from(path),
        None => StrandConfig::load(),
    };

    info!(input = %cli.input.display(), output_prefix = %cli.output_prefix.display(), "starting strand-align");

    if let Err(err) = pipeline::run(&cli.input, &cli.output_prefix, &config) {
        error!(%err, "strand-align failed");
        return Err(err.into());
    }

    info!("strand-align finished");
    Ok(())
}
