//! movieroi CLI - Movie ROI views from a wide movie CSV
//!
//! # Main Commands
//!
//! ```bash
//! movieroi report movies.csv --out out/           # Every table + metadata.json
//! movieroi roi movies.csv --by director           # One aggregate to stdout
//! movieroi top movies.csv --table movies-by-genre --filter genre=Drama --metric ROI
//! ```
//!
//! # Single Views
//!
//! ```bash
//! movieroi entities movies.csv --kind actor       # Distinct actors
//! movieroi facts movies.csv --kind genre          # One fact table
//! movieroi pivot movies.csv --genres Drama,Comedy # Genre/year chart table
//! movieroi classify 1500000                       # Budget tier
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use movieroi::config::parse_genres;
use movieroi::logs::{log_info, log_success, set_quiet};
use movieroi::transform::pipeline::format_delimiter;
use movieroi::{
    actors_list, actors_roi, analyze_file, classify, directors_list, directors_roi, genre_year,
    genre_year_pivot, genres_roi, movies_by_actor, movies_by_director, movies_by_genre, movies_frame,
    parse_movies_file, top_n, write_report, write_table_to, AnalysisOptions, OutputFormat,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "movieroi")]
#[command(about = "Actor, director and genre ROI views from a wide movie table", long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON options file (environment variables still override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (default from options)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every derived table and a metadata file into a directory
    Report {
        /// Input CSV file
        input: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },

    /// List distinct actors or directors with their popularity
    Entities {
        /// Input CSV file
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: EntityArg,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// One row per (movie, actor | director | genre)
    Facts {
        /// Input CSV file
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: FactArg,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Aggregate gross and budget and compute ROI per group
    Roi {
        /// Input CSV file
        input: PathBuf,

        #[arg(short, long, value_enum)]
        by: RoiBy,

        /// Comma-separated genres for `genre-year`
        #[arg(short, long)]
        genres: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Best rows of a view for one filter value
    Top {
        /// Input CSV file
        input: PathBuf,

        #[arg(short, long, value_enum)]
        table: View,

        /// Filter as `column=value`
        #[arg(long)]
        filter: String,

        /// Numeric column to rank by
        #[arg(short, long)]
        metric: String,

        /// Smallest metric value kept (default from options)
        #[arg(long)]
        min: Option<f64>,

        /// Number of rows (default from options)
        #[arg(short)]
        n: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Year-indexed movie count and ROI per genre
    Pivot {
        /// Input CSV file
        input: PathBuf,

        /// Comma-separated genres (default: all with data)
        #[arg(short, long)]
        genres: Option<String>,

        /// First year kept
        #[arg(short, long)]
        year_from: Option<i64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the budget tier of an amount
    Classify {
        #[arg(allow_hyphen_values = true)]
        budget: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EntityArg {
    Actor,
    Director,
}

#[derive(Clone, Copy, ValueEnum)]
enum FactArg {
    Actor,
    Director,
    Genre,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoiBy {
    Actor,
    Director,
    Genre,
    GenreYear,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Actors,
    Directors,
    MoviesByActor,
    MoviesByDirector,
    MoviesByGenre,
    ActorsRoi,
    DirectorsRoi,
    GenresRoi,
    GenreYear,
    GenreYearPivot,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let result = load_options(cli.config.as_deref(), cli.format).and_then(|options| run(cli.command, options));

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_options(path: Option<&Path>, format: Option<OutputFormat>) -> Result<AnalysisOptions, Box<dyn std::error::Error>> {
    let mut options = AnalysisOptions::load(path)?;
    if let Some(format) = format {
        options.format = format;
    }
    Ok(options)
}

fn run(command: Commands, options: AnalysisOptions) -> CliResult {
    match command {
        Commands::Report { input, out } => cmd_report(&input, &out, &options),
        Commands::Entities { input, kind, output } => cmd_entities(&input, kind, output.as_deref(), &options),
        Commands::Facts { input, kind, output } => cmd_facts(&input, kind, output.as_deref(), &options),
        Commands::Roi { input, by, genres, output } => {
            cmd_roi(&input, by, genres.as_deref(), output.as_deref(), options)
        }
        Commands::Top {
            input,
            table,
            filter,
            metric,
            min,
            n,
            output,
        } => {
            let min = min.unwrap_or(options.minimum_roi);
            let n = n.unwrap_or(options.top_n);
            cmd_top(&input, table, &filter, &metric, min, n, output.as_deref(), options)
        }
        Commands::Pivot {
            input,
            genres,
            year_from,
            output,
        } => cmd_pivot(&input, genres.as_deref(), year_from, output.as_deref(), options),
        Commands::Classify { budget } => cmd_classify(budget),
    }
}

/// Parse the input and build the wide movie frame.
fn read_movies(input: &Path) -> Result<DataFrame, Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing CSV: {}", input.display()));
    let parsed = parse_movies_file(input)?;
    log_info(format!("   Encoding: {}", parsed.encoding));
    log_info(format!("   Delimiter: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Parsed {} movies", parsed.movies.len()));
    Ok(movies_frame(&parsed.movies)?)
}

fn cmd_report(input: &Path, out: &Path, options: &AnalysisOptions) -> CliResult {
    let report = analyze_file(input, options)?;
    let written = write_report(&report, out, options.format)?;
    log_success(format!("✨ Done! {} files in {}", written.len(), out.display()));
    Ok(())
}

fn cmd_entities(input: &Path, kind: EntityArg, output: Option<&Path>, options: &AnalysisOptions) -> CliResult {
    let movies = read_movies(input)?;
    let table = match kind {
        EntityArg::Actor => actors_list(&movies)?,
        EntityArg::Director => directors_list(&movies)?,
    };
    write_table_to(&table, options.format, output)?;
    Ok(())
}

fn cmd_facts(input: &Path, kind: FactArg, output: Option<&Path>, options: &AnalysisOptions) -> CliResult {
    let movies = read_movies(input)?;
    let table = match kind {
        FactArg::Actor => movies_by_actor(&movies, &actors_list(&movies)?)?,
        FactArg::Director => movies_by_director(&movies, &directors_list(&movies)?)?,
        FactArg::Genre => movies_by_genre(&movies)?,
    };
    write_table_to(&table, options.format, output)?;
    Ok(())
}

fn cmd_roi(input: &Path, by: RoiBy, genres: Option<&str>, output: Option<&Path>, mut options: AnalysisOptions) -> CliResult {
    if let Some(list) = genres {
        options.genres = parse_genres(list)?;
    }
    let movies = read_movies(input)?;
    let table = match by {
        RoiBy::Actor => actors_roi(&movies_by_actor(&movies, &actors_list(&movies)?)?)?,
        RoiBy::Director => directors_roi(&movies_by_director(&movies, &directors_list(&movies)?)?)?,
        RoiBy::Genre => genres_roi(&movies_by_genre(&movies)?)?,
        RoiBy::GenreYear => genre_year(&movies_by_genre(&movies)?, &options.genres)?,
    };
    write_table_to(&table, options.format, output)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_top(
    input: &Path,
    view: View,
    filter: &str,
    metric: &str,
    min: f64,
    n: usize,
    output: Option<&Path>,
    options: AnalysisOptions,
) -> CliResult {
    let (key, value) = filter
        .split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| format!("Filter must look like column=value, got '{}'", filter))?;

    let report = analyze_file(input, &options)?;
    let table = match view {
        View::Actors => &report.actors,
        View::Directors => &report.directors,
        View::MoviesByActor => &report.movies_by_actor,
        View::MoviesByDirector => &report.movies_by_director,
        View::MoviesByGenre => &report.movies_by_genre,
        View::ActorsRoi => &report.actors_roi,
        View::DirectorsRoi => &report.directors_roi,
        View::GenresRoi => &report.genres_roi,
        View::GenreYear => &report.genre_year,
        View::GenreYearPivot => &report.genre_year_pivot,
    };

    let top = top_n(table, key, value, min, metric, n)?;
    log_success(format!("{} row(s) where {} = {}", top.height(), key, value));
    write_table_to(&top, options.format, output)?;
    Ok(())
}

fn cmd_pivot(
    input: &Path,
    genres: Option<&str>,
    year_from: Option<i64>,
    output: Option<&Path>,
    mut options: AnalysisOptions,
) -> CliResult {
    if let Some(list) = genres {
        options.genres = parse_genres(list)?;
    }
    if let Some(year) = year_from {
        options.year_from = year;
    }
    let movies = read_movies(input)?;
    let pivot = genre_year_pivot(&movies_by_genre(&movies)?, &options.genres, options.year_from)?;
    write_table_to(&pivot, options.format, output)?;
    Ok(())
}

fn cmd_classify(budget: f64) -> CliResult {
    println!("{}", classify(budget)?);
    Ok(())
}
