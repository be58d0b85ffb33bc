//! `taxo`: edits a taxonomy-and-constraint model stored as an OWL axiom
//! document.
//!
//! Every editing subcommand opens the workspace, applies one operation and
//! saves. Concepts are addressed by label; hierarchy roots by their name.
//!
//! **Usage:**
//! ```text
//! taxo --config menu.toml --document menu.json init
//! taxo --config menu.toml --document menu.json add Dish Pasta
//! taxo --config menu.toml --document menu.json constrain Pasta DishConstraint Wheat Egg
//! taxo --config menu.toml --document menu.json move Lasagne Baked
//! taxo --config menu.toml --document menu.json export --format turtle --out menu.ttl
//! taxo --config menu.toml --document menu.json check
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use taxo_clients::{init_cli_logger, PromptConfirmations};
use taxo_compiler::{check_model, Severity, Workspace};
use taxo_model::{
    AlwaysConfirm, ConceptId, ConfirmEveryMove, Confirmations, ConflictResolver,
    ConstraintTypeId, Model, RefinementResolver,
};
use tracing::info;

/// Edit, check and export a taxonomy-and-constraint model.
#[derive(Parser)]
#[command(name = "taxo", about = "Edit taxonomy-and-constraint models", version)]
struct Args {
    /// Schema configuration (TOML).
    #[arg(long, default_value = "taxo.toml")]
    config: PathBuf,

    /// Axiom document (JSON). Created on first save.
    #[arg(long, default_value = "taxo.json")]
    document: PathBuf,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,

    /// Confirm every move and constraint change without asking.
    #[arg(long, short)]
    yes: bool,

    /// Only ask when a change invalidates or contradicts existing constraints.
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write an empty document for the configured schema.
    Init,
    /// Print the hierarchies with their constraints.
    Show,
    /// Add a concept under a parent.
    Add {
        /// Parent concept or hierarchy root.
        parent: String,
        /// Name of the new concept.
        name: String,
    },
    /// Rename a concept.
    Rename {
        /// Current name.
        name: String,
        /// New name.
        new_name: String,
    },
    /// Remove a concept and everything beneath it.
    Remove {
        /// Concept to remove.
        name: String,
    },
    /// Move a concept under another parent in the same hierarchy.
    Move {
        /// Concept to move.
        name: String,
        /// New parent concept or hierarchy root.
        new_parent: String,
    },
    /// Attach a constraint to a concept, replacing one of the same type.
    Constrain {
        /// Source concept.
        source: String,
        /// Focus concept naming the constraint type.
        focus: String,
        /// Allowed target concepts.
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Remove a concept's own constraint of one type.
    Unconstrain {
        /// Source concept.
        source: String,
        /// Focus concept naming the constraint type.
        focus: String,
    },
    /// Show the constraint governing a concept.
    Closest {
        /// Concept to look up.
        concept: String,
        /// Focus concept naming the constraint type.
        focus: String,
    },
    /// Render the model as RDF.
    Export {
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Turtle)]
        format: Format,
        /// Output file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Verify the model's structural invariants.
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Turtle,
    Ntriples,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_cli_logger(args.verbose);

    if matches!(args.command, Command::Init) && args.document.exists() {
        bail!("{} already exists", args.document.display());
    }

    let mut ws = Workspace::open(&args.config, &args.document, resolver(&args))
        .with_context(|| {
            format!(
                "Failed to open {} with schema {}",
                args.document.display(),
                args.config.display()
            )
        })?;

    match args.command {
        Command::Init => save(&mut ws)?,
        Command::Show => show(ws.model())?,
        Command::Add { parent, name } => {
            let model = ws.model_mut();
            let parent = concept(model, &parent)?;
            model.add_child(parent, &name)?;
            save(&mut ws)?;
        }
        Command::Rename { name, new_name } => {
            let model = ws.model_mut();
            let id = concept(model, &name)?;
            if !model.rename(id, &new_name)? {
                bail!("'{new_name}' is already in use");
            }
            save(&mut ws)?;
        }
        Command::Remove { name } => {
            let model = ws.model_mut();
            let id = concept(model, &name)?;
            model.remove(id)?;
            save(&mut ws)?;
        }
        Command::Move { name, new_parent } => {
            let model = ws.model_mut();
            let id = concept(model, &name)?;
            let parent = concept(model, &new_parent)?;
            if model.move_concept(id, parent)? {
                save(&mut ws)?;
            } else {
                println!("Move cancelled; nothing changed.");
            }
        }
        Command::Constrain {
            source,
            focus,
            targets,
        } => {
            let model = ws.model_mut();
            let source = concept(model, &source)?;
            let ty = constraint_type(model, &focus)?;
            let targets = targets
                .iter()
                .map(|t| concept(model, t))
                .collect::<Result<Vec<_>>>()?;
            if model.add_constraint(source, ty, targets)? {
                save(&mut ws)?;
            } else {
                println!("Constraint unchanged.");
            }
        }
        Command::Unconstrain { source, focus } => {
            let model = ws.model_mut();
            let id = concept(model, &source)?;
            let ty = constraint_type(model, &focus)?;
            let own = model
                .own_constraint(id, ty)
                .ok_or_else(|| anyhow!("'{source}' has no {focus} of its own"))?;
            model.remove_constraint(own)?;
            save(&mut ws)?;
        }
        Command::Closest { concept: name, focus } => {
            let model = ws.model();
            let id = concept(model, &name)?;
            let ty = constraint_type(model, &focus)?;
            let governing = model.constraint(model.closest_constraint(id, ty)?)?;
            let from = label(model, governing.source());
            let targets = labels(model, governing.targets().iter().copied());
            if governing.source() == id {
                println!("{name}: {focus} allows {targets} (own)");
            } else {
                println!("{name}: {focus} allows {targets} (inherited from {from})");
            }
        }
        Command::Export { format, out } => {
            let text = match format {
                Format::Turtle => ws.export_turtle()?,
                Format::Ntriples => ws.export_ntriples()?,
            };
            fs::write(&out, text).with_context(|| format!("Failed to write {}", out.display()))?;
            println!("  Written: {}", out.display());
        }
        Command::Check => check(ws.model()),
    }
    Ok(())
}

fn resolver(args: &Args) -> Box<dyn ConflictResolver> {
    let confirmations: Box<dyn Confirmations> = if args.yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(PromptConfirmations::stdio())
    };
    if args.strict {
        Box::new(RefinementResolver::new(confirmations))
    } else {
        Box::new(ConfirmEveryMove::new(confirmations))
    }
}

fn save(ws: &mut Workspace) -> Result<()> {
    let summary = ws
        .save()
        .with_context(|| format!("Failed to save {}", ws.path().display()))?;
    info!(
        concepts = summary.concepts,
        definitions = summary.definitions,
        "saved"
    );
    println!("  Written: {}", ws.path().display());
    Ok(())
}

/// Resolves a concept by content name, then by root name, then by label.
fn concept(model: &Model, name: &str) -> Result<ConceptId> {
    let namespaces = model.namespaces();
    let by_iri = |id: Result<taxo_model::Identifier, _>| {
        id.ok().and_then(|id| model.find_concept(id.uri()))
    };
    by_iri(namespaces.content_identifier(name))
        .or_else(|| by_iri(namespaces.schema_identifier(name)))
        .or_else(|| model.find_by_label(name))
        .ok_or_else(|| anyhow!("no concept named '{name}'"))
}

fn constraint_type(model: &Model, focus: &str) -> Result<ConstraintTypeId> {
    model
        .constraint_type_by_focus_label(focus)
        .ok_or_else(|| anyhow!("no constraint type with focus '{focus}'"))
}

fn label(model: &Model, id: ConceptId) -> String {
    model
        .concept(id)
        .map(|c| c.identity().label().to_owned())
        .unwrap_or_else(|_| format!("#{}", id.index()))
}

fn labels(model: &Model, ids: impl Iterator<Item = ConceptId>) -> String {
    let mut names: Vec<String> = ids.map(|id| label(model, id)).collect();
    names.sort();
    names.join(", ")
}

fn show(model: &Model) -> Result<()> {
    for hierarchy in model.hierarchies() {
        let root = hierarchy.root();
        for id in model.concepts().subtree(root) {
            let depth = model.concepts().depth(id);
            let mut line = format!("{}{}", "  ".repeat(depth), label(model, id));
            for &k in model.concept(id)?.outward_constraints() {
                let constraint = model.constraint(k)?;
                let focus = model.constraint_type(constraint.constraint_type())?.focus();
                let targets = labels(model, constraint.targets().iter().copied());
                line.push_str(&format!("  [{}: {}]", focus.label(), targets));
            }
            println!("{line}");
        }
        println!();
    }
    Ok(())
}

fn check(model: &Model) {
    println!("Model Consistency Report");
    println!("========================");
    println!();

    let report = check_model(model);
    for result in &report.results {
        let status = match result.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        println!("[{}] {}: {}", status, result.check, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.failure_count();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.results.len() - failed - report.warning_count(),
        report.warning_count(),
        failed
    );
    if failed > 0 {
        eprintln!("Check FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }
}
