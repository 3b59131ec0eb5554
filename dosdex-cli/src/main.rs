//! dosdex CLI
//!
//! Command-line tooling for the DOS game launcher catalog: import LaunchBox
//! metadata into GAMES.DAT and query the catalog with the launcher's
//! filters.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dosdex_catalog::genre::{genre_code_to_name, genre_name_to_code};
use dosdex_catalog::titles::DEFAULT_MATCH_THRESHOLD;
use dosdex_catalog::types::{FmSound, GameEntry, Graphics, LegacySound, MidiSound};
use dosdex_import::{
    ReconcileOptions, ReconcileOutcome, ReconcileReport, parse_launchbox_file, reconcile,
};
use dosdex_store::{GameFilter, GameStore, MapStore, filter_games};

use error::CliError;

#[derive(Parser)]
#[command(name = "dosdex")]
#[command(about = "Catalog tooling for the DOS game launcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import metadata from a LaunchBox XML export into GAMES.DAT
    Import {
        /// LaunchBox XML export (e.g. Metadata.xml)
        xml: PathBuf,

        /// Catalog file to update
        #[arg(long, default_value = "GAMES.DAT")]
        dat: PathBuf,

        /// Minimum title similarity for fuzzy matches (0.0-1.0)
        #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
        threshold: f64,

        /// Report what would change without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List catalog entries matching the launcher's filters
    List {
        /// Catalog file to read
        #[arg(long, default_value = "GAMES.DAT")]
        dat: PathBuf,

        /// Title substring (case-insensitive)
        #[arg(short, long)]
        title: Option<String>,

        /// Publisher substring (case-insensitive)
        #[arg(short, long)]
        publisher: Option<String>,

        /// Exact release year
        #[arg(short, long)]
        year: Option<String>,

        /// Genre name (e.g. Strategy)
        #[arg(short, long)]
        genre: Option<String>,

        /// Legacy sound hardware, comma-separated (e.g. "pc speaker,covox")
        #[arg(long)]
        sound: Option<String>,

        /// FM cards, comma-separated (e.g. sb16,gus)
        #[arg(long)]
        fm: Option<String>,

        /// MIDI hardware, comma-separated (e.g. mt-32,mpu401)
        #[arg(long)]
        midi: Option<String>,

        /// Graphics adapters, comma-separated (e.g. vga,ega)
        #[arg(long)]
        gfx: Option<String>,

        /// Only titles that run without a CD
        #[arg(long)]
        no_cd: bool,

        /// Include soft-deleted entries
        #[arg(long)]
        deleted: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            xml,
            dat,
            threshold,
            dry_run,
        } => run_import(&xml, &dat, threshold, dry_run),
        Commands::List {
            dat,
            title,
            publisher,
            year,
            genre,
            sound,
            fm,
            midi,
            gfx,
            no_cd,
            deleted,
        } => run_list(
            &dat, title, publisher, year, genre, sound, fm, midi, gfx, no_cd, deleted,
        ),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".if_supports_color(Stdout, |t| t.red()));
        std::process::exit(1);
    }
}

// ── import ──────────────────────────────────────────────────────────────────

fn run_import(xml: &Path, dat: &Path, threshold: f64, dry_run: bool) -> Result<(), CliError> {
    let batch = parse_launchbox_file(xml)?;
    println!("{} games in {}", batch.len(), xml.display());

    let map_path = map_path_for(dat);
    log::debug!("mapping file: {}", map_path.display());
    let options = ReconcileOptions {
        match_threshold: threshold,
        ..Default::default()
    };

    let report = if dry_run {
        // Work on in-memory copies; nothing touches the files.
        let mut games = GameStore::from_bytes(read_optional(dat)?);
        let mut mappings = MapStore::from_bytes(read_optional(&map_path)?);
        reconcile(&mut games, &mut mappings, &batch, &options)?
    } else {
        if dat.exists() {
            let backup = backup_path(dat);
            fs::copy(dat, &backup)?;
            println!("backed up catalog to {}", backup.display());
        }
        let mut games = GameStore::open(dat)?;
        let mut mappings = MapStore::open(&map_path)?;
        reconcile(&mut games, &mut mappings, &batch, &options)?
    };

    print_report(&report);
    if dry_run {
        println!(
            "{}",
            "dry run: no changes written".if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    Ok(())
}

/// LBMAP.DAT lives next to the catalog file.
fn map_path_for(dat: &Path) -> PathBuf {
    match dat.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("LBMAP.DAT"),
        Some(parent) => parent.join("LBMAP.DAT"),
        None => PathBuf::from("LBMAP.DAT"),
    }
}

fn backup_path(dat: &Path) -> PathBuf {
    let mut name = dat.as_os_str().to_owned();
    name.push(".BAK");
    PathBuf::from(name)
}

fn read_optional(path: &Path) -> Result<Vec<u8>, CliError> {
    if path.exists() {
        Ok(fs::read(path)?)
    } else {
        Ok(Vec::new())
    }
}

fn print_report(report: &ReconcileReport) {
    for detail in &report.details {
        match detail.outcome {
            ReconcileOutcome::MatchedExact => println!(
                "  {} {} -> #{} {}",
                "exact".if_supports_color(Stdout, |t| t.green()),
                detail.external_title,
                detail.position,
                detail.catalog_title,
            ),
            ReconcileOutcome::MatchedFuzzy => println!(
                "  {} {} -> #{} {} ({:.0}%)",
                "fuzzy".if_supports_color(Stdout, |t| t.yellow()),
                detail.external_title,
                detail.position,
                detail.catalog_title,
                detail.score.unwrap_or_default() * 100.0,
            ),
            ReconcileOutcome::Created => println!(
                "  {}   {} -> #{}",
                "new".if_supports_color(Stdout, |t| t.cyan()),
                detail.external_title,
                detail.position,
            ),
        }
    }

    if !report.ambiguous.is_empty() {
        println!();
        for ambiguous in &report.ambiguous {
            println!(
                "{} ambiguous: '{}' matches '{}' ({:.0}%) and '{}' ({:.0}%); created a new entry instead",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                ambiguous.external_title,
                ambiguous.best_title,
                ambiguous.best_score * 100.0,
                ambiguous.runner_up_title,
                ambiguous.runner_up_score * 100.0,
            );
        }
    }

    println!();
    println!(
        "{} {} exact, {} fuzzy, {} created, {} ambiguous",
        "Summary:".if_supports_color(Stdout, |t| t.bold()),
        report.stats.matched_exact,
        report.stats.matched_fuzzy,
        report.stats.created,
        report.ambiguous.len(),
    );
}

// ── list ────────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run_list(
    dat: &Path,
    title: Option<String>,
    publisher: Option<String>,
    year: Option<String>,
    genre: Option<String>,
    sound: Option<String>,
    fm: Option<String>,
    midi: Option<String>,
    gfx: Option<String>,
    no_cd: bool,
    deleted: bool,
) -> Result<(), CliError> {
    let filter = GameFilter {
        title,
        publisher,
        year,
        genre: genre.as_deref().map(parse_genre).transpose()?,
        sound: sound
            .as_deref()
            .map(|s| parse_mask(s, LegacySound::from_display_name, LegacySound::NAMED, "sound device"))
            .transpose()?,
        fm: fm
            .as_deref()
            .map(|s| parse_mask(s, FmSound::from_display_name, FmSound::NAMED, "FM card"))
            .transpose()?,
        midi: midi
            .as_deref()
            .map(|s| parse_mask(s, MidiSound::from_display_name, MidiSound::NAMED, "MIDI device"))
            .transpose()?,
        gfx: gfx
            .as_deref()
            .map(|s| parse_mask(s, Graphics::from_display_name, Graphics::NAMED, "graphics adapter"))
            .transpose()?,
        no_removable_media: no_cd,
        include_deleted: deleted,
    };

    let mut store = GameStore::from_bytes(read_optional(dat)?);
    let mut shown = 0u32;
    for item in filter_games(&mut store, &filter) {
        let (position, entry) = item?;
        print_entry(position, &entry);
        shown += 1;
    }

    println!();
    println!("{shown} of {} entries", store.record_count());
    Ok(())
}

fn parse_genre(input: &str) -> Result<u8, CliError> {
    let code = genre_name_to_code(input);
    if code == 0 && !input.trim().is_empty() && !input.eq_ignore_ascii_case("(None)") {
        return Err(CliError::invalid_filter(format!("unknown genre '{input}'")));
    }
    Ok(code)
}

/// Parse a comma-separated list of flag names into one mask.
fn parse_mask<T>(
    input: &str,
    from_display_name: impl Fn(&str) -> Option<T>,
    named: &[(T, &'static str)],
    what: &str,
) -> Result<T, CliError>
where
    T: Copy + Default + std::ops::BitOrAssign,
{
    let mut mask = T::default();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some(flag) = from_display_name(part) else {
            let valid: Vec<&str> = named.iter().map(|(_, n)| *n).collect();
            return Err(CliError::invalid_filter(format!(
                "unknown {what} '{part}' (expected one of: {})",
                valid.join(", ")
            )));
        };
        mask |= flag;
    }
    Ok(mask)
}

fn print_entry(position: u32, entry: &GameEntry) {
    let marker = if entry.deleted {
        "x"
    } else if entry.requires_cd {
        "c"
    } else {
        " "
    };
    println!(
        "{:>5}{} {:<50} {:<4} {:<30} {}",
        position.if_supports_color(Stdout, |t| t.dimmed()),
        marker,
        entry.title,
        entry.year,
        entry.publisher,
        genre_code_to_name(entry.genre_code),
    );

    let mut hardware = Vec::new();
    if !entry.sound_flags.is_empty() {
        hardware.push(format!("Sound: {}", entry.sound_flags.names().join(", ")));
    }
    if !entry.fm_flags.is_empty() {
        hardware.push(format!("FM: {}", entry.fm_flags.names().join(", ")));
    }
    if !entry.midi_flags.is_empty() {
        hardware.push(format!("MIDI: {}", entry.midi_flags.names().join(", ")));
    }
    if !entry.gfx_flags.is_empty() {
        hardware.push(format!("Gfx: {}", entry.gfx_flags.names().join(", ")));
    }
    if !hardware.is_empty() {
        println!(
            "       {}",
            hardware
                .join(" | ")
                .if_supports_color(Stdout, |t| t.dimmed())
        );
    }
}
