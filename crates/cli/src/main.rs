//! OPL CLI — parse, check, and summarize OSM Protocol Line files.

mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use opl_toolchain_core::{
    parse_line, to_pretty_json, Entity, EntityKinds, EntitySink, OplError,
};
use serde::Serialize;

use crate::render::Format;

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "opl",
    version,
    about = "OPL toolchain — parse, check, and summarize OSM Protocol Line files"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Entity kinds to process, as a subset of the letters "nwrc"
    /// (nodes, ways, relations, changesets). Masked-out lines are
    /// skipped without being parsed.
    #[arg(long, global = true, default_value = "nwrc", value_parser = parse_kinds)]
    types: EntityKinds,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse an OPL file and print its entities as JSON.
    Parse {
        /// OPL source file to parse.
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Syntax-check an OPL file (parse only, print nothing on success).
    Check {
        /// OPL source file to check.
        #[arg(value_name = "FILE")]
        file: String,
        /// Report every failing line instead of stopping at the first.
        #[arg(long)]
        keep_going: bool,
    },

    /// Count entities, tags, way-nodes, and members.
    Stats {
        /// OPL source file to summarize.
        #[arg(value_name = "FILE")]
        file: String,
    },
}

fn parse_kinds(arg: &str) -> Result<EntityKinds, String> {
    let mut kinds = EntityKinds::empty();
    for letter in arg.chars() {
        kinds |= EntityKinds::from_letter(letter).ok_or_else(|| {
            format!("unknown entity type letter '{letter}' (expected a subset of \"nwrc\")")
        })?;
    }
    if kinds.is_empty() {
        return Err("at least one entity type letter is required".into());
    }
    Ok(kinds)
}

// ── Entry point ─────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());
    let code = match run(cli.cmd, cli.types, format) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };
    process::exit(code);
}

fn run(cmd: Cmd, kinds: EntityKinds, format: Format) -> Result<i32> {
    match cmd {
        Cmd::Parse { file } => cmd_parse(&file, kinds, format),
        Cmd::Check { file, keep_going } => cmd_check(&file, kinds, keep_going, format),
        Cmd::Stats { file } => cmd_stats(&file, kinds, format),
    }
}

/// Read a file and iterate its logical lines, numbered from 1.
///
/// Lines split on `\n`; a trailing `\r` is stripped, so CRLF files work.
fn read_source(file: &str) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("failed to read {file}"))
}

fn numbered_lines(source: &str) -> impl Iterator<Item = (u64, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx as u64 + 1, line))
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, kinds: EntityKinds, format: Format) -> Result<i32> {
    let source = read_source(file)?;
    let mut entities: Vec<Entity> = Vec::new();
    for (number, line) in numbered_lines(&source) {
        if let Err(error) = parse_line(number, line, kinds, &mut entities) {
            render::render_errors(&source, file, &[error], format);
            return Ok(1);
        }
    }
    println!("{}", to_pretty_json(&entities));
    Ok(0)
}

fn cmd_check(file: &str, kinds: EntityKinds, keep_going: bool, format: Format) -> Result<i32> {
    let source = read_source(file)?;
    let mut errors: Vec<OplError> = Vec::new();
    let mut entities: u64 = 0;

    for (number, line) in numbered_lines(&source) {
        // Recovery is at line granularity: a failed line commits nothing
        // and the next line starts fresh.
        let mut sink = Discard;
        match parse_line(number, line, kinds, &mut sink) {
            Ok(committed) => entities += u64::from(committed),
            Err(error) => {
                errors.push(error);
                if !keep_going {
                    break;
                }
            }
        }
    }

    if errors.is_empty() {
        match format {
            Format::Pretty => eprintln!("{file}: OK ({entities} entities)"),
            Format::Json => println!(
                "{}",
                serde_json::json!({ "file": file, "status": "ok", "entities": entities })
            ),
        }
        Ok(0)
    } else {
        render::render_errors(&source, file, &errors, format);
        Ok(1)
    }
}

fn cmd_stats(file: &str, kinds: EntityKinds, format: Format) -> Result<i32> {
    let source = read_source(file)?;
    let mut stats = Stats::default();
    for (number, line) in numbered_lines(&source) {
        if let Err(error) = parse_line(number, line, kinds, &mut stats) {
            render::render_errors(&source, file, &[error], format);
            return Ok(1);
        }
    }

    match format {
        Format::Pretty => print!("{}", stats.render_table()),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&stats).expect("stats serialization cannot fail")
        ),
    }
    Ok(0)
}

// ── Sinks ───────────────────────────────────────────────────────────────

/// Sink for `check`: parse for effect, keep nothing.
struct Discard;

impl EntitySink for Discard {
    fn commit(&mut self, _entity: Entity) {}
}

/// Sink for `stats`: count per kind plus list payloads.
#[derive(Debug, Default, Serialize)]
struct Stats {
    nodes: u64,
    ways: u64,
    relations: u64,
    changesets: u64,
    tags: u64,
    way_nodes: u64,
    members: u64,
}

impl EntitySink for Stats {
    fn commit(&mut self, entity: Entity) {
        self.tags += entity.tags().len() as u64;
        match entity {
            Entity::Node(_) => self.nodes += 1,
            Entity::Way(way) => {
                self.ways += 1;
                self.way_nodes += way.nodes.len() as u64;
            }
            Entity::Relation(relation) => {
                self.relations += 1;
                self.members += relation.members.len() as u64;
            }
            Entity::Changeset(_) => self.changesets += 1,
            _ => {}
        }
    }
}

impl Stats {
    fn render_table(&self) -> String {
        format!(
            "nodes      {}\n\
             ways       {}\n\
             relations  {}\n\
             changesets {}\n\
             tags       {}\n\
             way_nodes  {}\n\
             members    {}\n",
            self.nodes,
            self.ways,
            self.relations,
            self.changesets,
            self.tags,
            self.way_nodes,
            self.members,
        )
    }
}
