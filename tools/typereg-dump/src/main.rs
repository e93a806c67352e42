// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! typereg-dump - Dump the type registry
//!
//! Lists every registered name with its structural type, or inspects a
//! single entry (fields, zero value, settability).

use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::sync::Arc;
use typereg::{
    any_settable, canonical_name, is_self_referential, RegistryConfig, TypeDescriptor, TypeKind,
    TypeRegistry,
};

/// Dump the type registry
#[derive(Parser, Debug)]
#[command(name = "typereg-dump")]
#[command(version)]
#[command(about = "Dump registered runtime types (name -> structural type)")]
struct Args {
    /// Inspect a single registered name
    #[arg(short, long)]
    lookup: Option<String>,

    /// Only show names containing this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Start from an empty registry (skip builtin types)
    #[arg(long)]
    no_builtins: bool,

    /// Quiet mode - `name<TAB>type` lines only
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegistryConfig::default().with_builtins(!args.no_builtins);
    let registry = TypeRegistry::with_config(&config);
    log::debug!("registry ready with {} entries", registry.len());

    if let Some(ref name) = args.lookup {
        let desc = registry.lookup(name)?;
        print_entry(&registry, name, &desc)?;
        return Ok(());
    }

    if args.quiet && args.filter.is_none() {
        let stdout = io::stdout();
        registry.dump(&mut stdout.lock())?;
        return Ok(());
    }

    let entries: Vec<_> = registry
        .entries()
        .into_iter()
        .filter(|(name, _)| args.filter.as_ref().map_or(true, |f| name.contains(f.as_str())))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.quiet {
        for (name, desc) in &entries {
            writeln!(out, "{}\t{}", name, desc)?;
        }
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}", "=== Type Registry ===".bold())?;
    writeln!(out)?;
    writeln!(
        out,
        "{} {} type(s)",
        "Types:".cyan().bold(),
        entries.len()
    )?;
    writeln!(out)?;

    for (name, desc) in &entries {
        let alias = canonical_name(desc) != *name;
        let marker = if alias { " (alias)".dimmed() } else { "".normal() };
        writeln!(
            out,
            "  {:<32} {}{}",
            name.green(),
            desc.to_string().white(),
            marker
        )?;
    }
    writeln!(out)?;

    Ok(())
}

fn print_entry(
    registry: &TypeRegistry,
    name: &str,
    desc: &Arc<TypeDescriptor>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{} {}", "Name:".cyan().bold(), name.green())?;
    writeln!(out, "  Canonical: {}", canonical_name(desc))?;
    writeln!(out, "  Type:      {}", desc)?;
    writeln!(out, "  Kind:      {}", desc.kind.tag())?;

    let record = match &desc.kind {
        TypeKind::Reference(target) => target.as_ref(),
        _ => desc.as_ref(),
    };
    if record.is_record() {
        writeln!(out, "  Fields:")?;
        for field in record.fields() {
            let visibility = if field.is_public() {
                "pub".green()
            } else {
                "priv".yellow()
            };
            writeln!(
                out,
                "    {:<5} {} {}",
                visibility,
                field.name,
                field.type_desc.to_string().dimmed()
            )?;
        }
        if is_self_referential(desc) {
            writeln!(out, "  {}", "self-referential".yellow())?;
        }
    }

    match registry.make(name) {
        Ok(value) => writeln!(
            out,
            "  Settable:  {}",
            if any_settable(&value) {
                "yes".green()
            } else {
                "no".red()
            }
        )?,
        Err(e) => writeln!(out, "  {} {}", "Cannot instantiate:".red(), e)?,
    }

    Ok(())
}
