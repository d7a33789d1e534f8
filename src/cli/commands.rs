//! Command dispatch for the curtree binary

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{
    default_seed, snapshot, ApplicationError, HierarchyEditor, JsonResultExt, SeedShape,
    ValidationReport,
};
use crate::cli::args::{Cli, Commands, InputArgs, OutputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{
    blocks_per_phase, count_by_kind, depth, find, flatten_blocks, Command, DomainError, Forest,
    HierarchyArena, NodeId, ToTermTree, ValidationResult,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // completions must work even when the config is broken
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Seed {
            phases,
            blocks,
            output,
        }) => cmd_seed(&settings, *phases, *blocks, output),
        Some(Commands::Show { input, node }) => cmd_show(input, node.as_deref()),
        Some(Commands::Validate { input, json }) => cmd_validate(&settings, input, *json),
        Some(Commands::Counts { input, json }) => cmd_counts(input, *json),
        Some(Commands::Blocks { input, json }) => cmd_blocks(input, *json),
        Some(Commands::Insert {
            input,
            parent,
            kind,
            output,
        }) => cmd_edit(
            &settings,
            input,
            output,
            Command::Insert {
                parent_id: NodeId::from(parent.as_str()),
                kind: *kind,
            },
        ),
        Some(Commands::AddProgram { input, output }) => {
            cmd_edit(&settings, input, output, Command::InsertRoot)
        }
        Some(Commands::Rename {
            input,
            node,
            name,
            output,
        }) => cmd_edit(
            &settings,
            input,
            output,
            Command::Rename {
                node_id: NodeId::from(node.as_str()),
                name: name.clone(),
            },
        ),
        Some(Commands::Delete {
            input,
            node,
            output,
        }) => cmd_edit(
            &settings,
            input,
            output,
            Command::Delete {
                node_id: NodeId::from(node.as_str()),
            },
        ),
        Some(Commands::Config) => cmd_config(&settings),
        Some(Commands::Completion { .. }) => Ok(()),
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(settings))]
fn cmd_seed(
    settings: &Settings,
    phases: Option<usize>,
    blocks: Option<usize>,
    output: &OutputArgs,
) -> CliResult<()> {
    let shape = SeedShape {
        program_name: settings.seed.program_name.clone(),
        phases: phases.unwrap_or(settings.seed.phases),
        blocks_per_phase: blocks.unwrap_or(settings.seed.blocks_per_phase),
    };
    if shape.phases == 0 {
        return Err(CliError::InvalidArgs("--phases must be at least 1".into()));
    }
    write_forest(&default_seed(&shape), output.output.as_deref())
}

#[instrument(level = "debug")]
fn cmd_show(input: &InputArgs, node: Option<&str>) -> CliResult<()> {
    let forest = snapshot::load(&input.file)?;
    let Some(node) = node else {
        output::info(&forest.to_term_tree());
        return Ok(());
    };

    let id = NodeId::from(node);
    let arena = HierarchyArena::from_forest(&forest);
    let entry = arena
        .get(&id)
        .ok_or_else(|| ApplicationError::from(DomainError::NodeNotFound(id.clone())))?;
    if let Some(crumb) = arena.breadcrumb(&id) {
        output::header(&format!("{} [{}]", crumb, entry.kind));
    }
    if let Some(subtree) = find(&forest, &id) {
        output::info(&subtree.to_term_tree());
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_validate(settings: &Settings, input: &InputArgs, json: bool) -> CliResult<()> {
    let forest = snapshot::load(&input.file)?;
    let report = ValidationReport::build(&forest, &settings.rules);

    if json {
        output::info(&to_json(&report)?);
    } else if report.is_valid() {
        output::success(&format!(
            "valid ({} programs, {} phases, {} blocks)",
            report.counts.programs, report.counts.phases, report.counts.blocks
        ));
    } else if let Some(reason) = report.result.reason() {
        output::failure(reason);
        if let Some(crumb) = &report.breadcrumb {
            output::detail(&format!("at {}", crumb));
        }
    }

    match report.result {
        ValidationResult::Valid => Ok(()),
        ValidationResult::Invalid { reason, node_id } => {
            Err(CliError::Invalid { reason, node_id })
        }
    }
}

#[instrument(level = "debug")]
fn cmd_counts(input: &InputArgs, json: bool) -> CliResult<()> {
    let forest = snapshot::load(&input.file)?;
    let counts = count_by_kind(&forest);
    if json {
        output::info(&to_json(&counts)?);
    } else {
        output::counts(&counts);
        output::info(&format!("{:<10}{}", "Depth", depth(&forest)));
        for (phase, blocks) in blocks_per_phase(&forest) {
            output::detail(&format!("{}: {} blocks", phase, blocks));
        }
    }
    Ok(())
}

#[instrument(level = "debug")]
fn cmd_blocks(input: &InputArgs, json: bool) -> CliResult<()> {
    let forest = snapshot::load(&input.file)?;
    let blocks = flatten_blocks(&forest);
    if json {
        output::info(&to_json(&blocks)?);
    } else {
        let arena = HierarchyArena::from_forest(&forest);
        for block in &blocks {
            let crumb = arena
                .breadcrumb(&block.id)
                .unwrap_or_else(|| block.name.clone());
            output::info(&format!("{}\t{}", block.id, crumb));
        }
    }
    Ok(())
}

/// Load, apply one command, write the result, warn if it no longer validates.
#[instrument(level = "debug", skip(settings))]
fn cmd_edit(
    settings: &Settings,
    input: &InputArgs,
    output: &OutputArgs,
    command: Command,
) -> CliResult<()> {
    let forest = snapshot::load(&input.file)?;
    let mut editor = HierarchyEditor::new(forest)
        .with_policy(settings.delete_policy)
        .with_rules(settings.rules.clone());

    let outcome = editor.apply(&command)?;
    if let Some(id) = &outcome.inserted {
        output::action("Inserted", id);
    }
    if !outcome.removed.is_empty() {
        output::action("Removed", &format!("{} nodes", outcome.removed.len()));
    }

    if let ValidationResult::Invalid { reason, node_id } = editor.validate() {
        output::warning(&format!("{} ({})", reason, node_id));
    }

    write_forest(editor.forest(), output.output.as_deref())?;
    editor.mark_saved();
    Ok(())
}

#[instrument(level = "debug")]
fn cmd_config(settings: &Settings) -> CliResult<()> {
    output::header("# effective settings");
    output::info(&settings.to_toml()?);
    Ok(())
}

fn write_forest(forest: &Forest, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(path) => {
            snapshot::save(path, forest)?;
            output::action("Wrote", &path.display());
            Ok(())
        }
        None => {
            let json = snapshot::to_json_pretty(forest)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).map_err(CliError::Output)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value).with_snapshot_context("serialize output")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn broken_config(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("curtree.toml");
        fs::write(&path, "[rules\nmax_blocks_per_phase = ").unwrap();
        path
    }

    #[test]
    fn given_broken_config_when_generating_completion_then_succeeds() {
        let dir = TempDir::new().unwrap();
        let config = broken_config(&dir);
        let cli = Cli::try_parse_from([
            "curtree",
            "--config",
            config.to_str().unwrap(),
            "completion",
            "bash",
        ])
        .unwrap();

        assert!(execute_command(&cli).is_ok());
    }

    #[test]
    fn given_broken_config_when_running_other_command_then_config_error() {
        let dir = TempDir::new().unwrap();
        let config = broken_config(&dir);
        let cli =
            Cli::try_parse_from(["curtree", "--config", config.to_str().unwrap(), "config"])
                .unwrap();

        let err = execute_command(&cli).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_unknown_node_when_showing_subtree_then_data_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("forest.json");
        snapshot::save(&file, &default_seed(&SeedShape::default())).unwrap();
        let cli = Cli::try_parse_from([
            "curtree",
            "show",
            file.to_str().unwrap(),
            "--node",
            "block-99",
        ])
        .unwrap();

        let err = execute_command(&cli).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_known_node_when_showing_subtree_then_ok() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("forest.json");
        snapshot::save(&file, &default_seed(&SeedShape::default())).unwrap();
        let cli = Cli::try_parse_from([
            "curtree",
            "show",
            file.to_str().unwrap(),
            "--node",
            "phase-2",
        ])
        .unwrap();

        assert!(execute_command(&cli).is_ok());
    }
}
