use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use county_spotlight::viz::RenderOptions;
use county_spotlight::{Client, CountySource, Mode, Target, pipeline, storage};
use num_format::{Locale, ToFormattedString};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "countypick",
    version,
    about = "Pick a U.S. county from Census TIGERweb and map it"
)]
struct Cli {
    #[command(flatten)]
    opts: GlobalArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Highlight a known county on its state's map.
    Fixed(FixedArgs),
    /// Pick any county in the nation and draw its boundary.
    Random,
    /// Pick a random state, then a random county within it.
    RandomState,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Feature query endpoint (ArcGIS MapServer layer `/query` URL).
    #[arg(long, env = "COUNTYPICK_BASE_URL", default_value = county_spotlight::api::DEFAULT_BASE_URL, global = true)]
    base_url: String,
    /// Seed for reproducible random picks (default: unseeded).
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Write the map here (.svg or .png).
    #[arg(long, default_value = "county_map.svg", global = true)]
    plot: PathBuf,
    /// Width of the map (default 1000).
    #[arg(long, default_value_t = 1000, global = true)]
    width: u32,
    /// Height of the map (default 1000).
    #[arg(long, default_value_t = 1000, global = true)]
    height: u32,
    /// Replace the generated map title.
    #[arg(long, global = true)]
    title: Option<String>,
    /// TrueType font used for PNG titles.
    #[arg(long, global = true)]
    font: Option<PathBuf>,
    /// Save the decoded county table (format inferred by --format or extension).
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    /// Table format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum, global = true)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct FixedArgs {
    /// Five-digit county GEOID (default 06109, Tuolumne County, California).
    #[arg(long, conflicts_with_all = ["state", "county"])]
    geoid: Option<String>,
    /// Two-digit state FIPS code; use with --county.
    #[arg(long, requires = "county")]
    state: Option<String>,
    /// Three-digit county FIPS code within --state.
    #[arg(long, requires = "state")]
    county: Option<String>,
}

impl FixedArgs {
    fn target(&self) -> Target {
        match (&self.geoid, &self.state, &self.county) {
            (Some(g), _, _) => Target::Geoid(g.trim().to_string()),
            (None, Some(s), Some(c)) => Target::County {
                state_fips: s.trim().to_string(),
                county_fips: c.trim().to_string(),
            },
            _ => Target::Geoid("06109".into()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mode = match &cli.cmd {
        Command::Fixed(args) => Mode::Fixed(args.target()),
        Command::Random => Mode::Random,
        Command::RandomState => Mode::RandomState,
    };
    let client = Client::new(cli.opts.base_url.clone());
    match cli.opts.seed {
        Some(seed) => cmd_pick(&client, &mode, &cli.opts, &mut StdRng::seed_from_u64(seed)),
        None => cmd_pick(&client, &mode, &cli.opts, &mut rand::rng()),
    }
}

fn cmd_pick<S: CountySource, R: rand::Rng>(
    source: &S,
    mode: &Mode,
    opts: &GlobalArgs,
    rng: &mut R,
) -> Result<()> {
    let job = pipeline::run(source, mode, rng).context("fetching county data")?;
    let county = &job.selection.feature;
    println!(
        "Selected County: {}, {}",
        county.name, job.selection.state_display
    );
    eprintln!(
        "GEOID {} among {} feature(s)",
        county.geoid,
        job.collection.len().to_formatted_string(&Locale::en)
    );

    if let Some(path) = opts.out.as_ref() {
        let fmt = match opts.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&job.collection, path)?,
            "json" => storage::save_json(&job.collection, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", job.collection.len(), path.display());
    }

    let options = RenderOptions {
        width: opts.width,
        height: opts.height,
        title: opts.title.clone(),
        font_path: opts.font.clone(),
        ..RenderOptions::default()
    };
    job.render(&opts.plot, &options)
        .with_context(|| format!("rendering {}", opts.plot.display()))?;
    eprintln!("Wrote map to {}", opts.plot.display());
    Ok(())
}
