use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use pathkeeper::{
    Ability, BackupEnvelope, CharacterStore, DcTarget, DerivedCharacter, Dice, DiceSpec, EngineConfig,
    Lookup, MemoryStore, RollHistory, builtin_builds, check, import_into,
};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

#[derive(Copy, Clone, ValueEnum)]
enum StatKind {
    Skill,
    Save,
    Attack,
    Perception,
}

#[derive(Subcommand)]
enum Cmd {
    /// Import Pathbuilder exports (one JSON object per line) into a backup file
    Import {
        /// Export file to read; may be given more than once
        #[arg(long = "input")]
        inputs: Vec<PathBuf>,
        /// Bundled sample build to import (valeros, kyra)
        #[arg(long = "builtin")]
        builtins: Vec<String>,
        /// Backup to merge into; created if missing
        #[arg(long)]
        backup: PathBuf,
    },
    /// Print a character's derived sheet
    Sheet {
        #[arg(long)]
        backup: PathBuf,
        /// Character name (case-insensitive)
        #[arg(long)]
        character: String,
        /// Print the derived character as JSON
        #[arg(long)]
        json: bool,
    },
    /// Roll dice in NdF+M notation
    Roll {
        /// e.g. d20, 3d6+2, 2d8-1
        notation: String,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
        /// Roll this many times; more than one also prints the recent totals
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// Roll a d20 check with a character's modifier against a DC
    Check {
        #[arg(long)]
        backup: PathBuf,
        #[arg(long)]
        character: String,
        #[arg(long, value_enum, default_value_t = StatKind::Skill)]
        kind: StatKind,
        /// Skill/save name, or attack name fragment
        #[arg(long, default_value = "")]
        stat: String,
        /// Difficulty Class to meet or beat
        #[arg(long)]
        dc: i32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Look up a character's DC: class, spell, or a skill name
    Dc {
        #[arg(long)]
        backup: PathBuf,
        #[arg(long)]
        character: String,
        /// "class", "spell", or a skill name
        #[arg(long)]
        target: String,
    },
}

#[derive(Parser)]
#[command(name = "pathkeeper")]
#[command(about = "Pathfinder 2e companion rules harness")]
struct Cli {
    /// YAML config (key abilities, roll history size)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// More logging: -v info, -vv debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.cmd {
        Cmd::Import {
            inputs,
            builtins,
            backup,
        } => {
            if inputs.is_empty() && builtins.is_empty() {
                bail!("nothing to import: pass --input or --builtin");
            }
            let mut envelope = load_or_new_backup(&backup)?;
            let mut store = MemoryStore::from_characters(envelope.characters.drain(..));

            let mut texts = Vec::new();
            for path in &inputs {
                texts.push(read_text_auto(path)?);
            }
            let bundled = builtin_builds();
            for name in &builtins {
                let text = bundled
                    .get(name.to_lowercase().as_str())
                    .ok_or_else(|| anyhow!("no bundled build named '{}'", name))?;
                texts.push(text.to_string());
            }

            let mut failed = 0;
            for text in &texts {
                let report = import_into(&mut store, text);
                for c in &report.imported {
                    println!("imported {} ({} {}, level {})", c.name, c.ancestry, c.class_name, c.level);
                }
                for name in &report.duplicates {
                    println!("skipped {} (already imported)", name);
                }
                for f in &report.failures {
                    eprintln!("document {}: {}", f.document, f.error);
                }
                failed += report.failures.len();
            }

            let out = BackupEnvelope::new(store.get_all(), envelope.content, envelope.gm_notes);
            fs::write(&backup, out.to_json()?)
                .with_context(|| format!("failed to write backup: {}", backup.display()))?;
            if failed > 0 {
                bail!("{} document(s) failed to import", failed);
            }
        }
        Cmd::Sheet {
            backup,
            character,
            json,
        } => {
            let envelope = load_backup(&backup)?;
            let c = find_character(&envelope.characters, &character)?;
            if json {
                println!("{}", serde_json::to_string_pretty(c)?);
            } else {
                let class_dc = config
                    .key_ability_for(c)
                    .and_then(|key| Some((Lookup::new(&envelope.characters).class_dc(&c.id, key)?, key)));
                print_sheet(c, class_dc);
            }
        }
        Cmd::Roll {
            notation,
            seed,
            times,
        } => {
            let spec: DiceSpec = notation.parse()?;
            let mut dice = dice_for(seed);
            let mut history = RollHistory::with_capacity(config.roll_history);
            for _ in 0..times {
                let record = spec.roll(&mut dice)?;
                println!("{}", record);
                history.push(record);
            }
            debug!(kept = history.len(), "roll history");
            if times > 1 {
                let totals: Vec<String> = history.iter().map(|r| r.total.to_string()).collect();
                println!("recent totals (newest first): {}", totals.join(", "));
            }
        }
        Cmd::Check {
            backup,
            character,
            kind,
            stat,
            dc,
            seed,
        } => {
            let envelope = load_backup(&backup)?;
            let c = find_character(&envelope.characters, &character)?;
            let lookup = Lookup::new(&envelope.characters);
            let modifier = match kind {
                StatKind::Skill => lookup.skill(&c.id, &stat),
                StatKind::Save => lookup.save(&c.id, &stat),
                StatKind::Attack => lookup.attack(&c.id, &stat),
                StatKind::Perception => lookup.perception(&c.id),
            }
            .ok_or_else(|| anyhow!("{} has no stat '{}'", c.name, stat))?;

            let mut dice = dice_for(seed);
            let res = check(&mut dice, modifier, dc);
            println!(
                "{} {} (mod={:+}): roll={} total={} vs dc={} => {}",
                c.name,
                if stat.is_empty() { "perception" } else { stat.as_str() },
                modifier,
                res.roll.results[0],
                res.total(),
                res.dc,
                if res.passed { "SUCCESS" } else { "FAIL" }
            );
        }
        Cmd::Dc {
            backup,
            character,
            target,
        } => {
            let envelope = load_backup(&backup)?;
            let c = find_character(&envelope.characters, &character)?;
            let target = match target.to_lowercase().as_str() {
                "class" => DcTarget::Class(
                    config
                        .key_ability_for(c)
                        .ok_or_else(|| anyhow!("no key ability configured for {}", c.class_name))?,
                ),
                "spell" => DcTarget::Spell,
                _ => DcTarget::Skill(target.clone()),
            };
            match Lookup::new(&envelope.characters).dc(&c.id, &target) {
                Some(dc) => println!("{}", dc),
                None => bail!("{} has no DC for '{}'", c.name, target_label(&target)),
            }
        }
    }
    Ok(())
}

fn target_label(target: &DcTarget) -> String {
    match target {
        DcTarget::Class(ability) => format!("class ({})", ability),
        DcTarget::Spell => "spell".to_string(),
        DcTarget::Skill(name) => name.clone(),
    }
}

fn dice_for(seed: Option<u64>) -> Dice {
    match seed {
        Some(seed) => Dice::from_seed(seed),
        None => Dice::from_entropy(),
    }
}

fn find_character<'a>(characters: &'a [DerivedCharacter], name: &str) -> Result<&'a DerivedCharacter> {
    characters
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("character '{}' not found", name))
}

fn print_sheet(c: &DerivedCharacter, class_dc: Option<(i32, Ability)>) {
    println!("{} - {} {} {}", c.name, c.ancestry, c.class_name, c.level);
    println!("HP {}  AC {}  {}", c.hp, c.ac, c.perception);
    if let Some((dc, key)) = class_dc {
        println!("Class DC {} ({})", dc, key);
    }
    println!("-- Saves");
    for line in &c.saves {
        println!("  {}", line);
    }
    println!("-- Skills");
    for line in c.skills.iter().chain(&c.lores) {
        println!("  {}", line);
    }
    println!("-- Attacks");
    for line in &c.attacks {
        println!("  {}", line);
    }
    if !c.spellcasting.is_empty() {
        println!("-- Spellcasting");
        for line in &c.spellcasting {
            println!("  {}", line);
        }
    }
}

fn load_backup(path: &Path) -> Result<BackupEnvelope> {
    let text = read_text_auto(path)?;
    BackupEnvelope::from_json(&text)
        .with_context(|| format!("failed to parse backup: {}", path.display()))
}

fn load_or_new_backup(path: &Path) -> Result<BackupEnvelope> {
    if path.exists() {
        load_backup(path)
    } else {
        Ok(BackupEnvelope::new(Vec::new(), Vec::new(), Vec::new()))
    }
}

/// Pathbuilder exports saved on Windows often carry a UTF-16 BOM.
fn read_text_auto(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}
