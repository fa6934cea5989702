//! `navdex show` command implementation.

use std::fmt::Write as _;

use clap::Args;
use navdex_config::{CliSettings, Config};
use navdex_index::{NavNode, NavigationTree};

use super::{SourceArgs, load_tree};
use crate::error::CliError;
use crate::output::Output;

const INDENT: &str = "  ";

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Include item summaries.
    #[arg(long)]
    summaries: bool,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading or building fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source.source_dir.clone(),
            legacy: self.source.resolve_legacy(),
            ..Default::default()
        };
        let config = Config::load(self.source.config.as_deref(), Some(&cli_settings))?;

        match load_tree(&config, output)? {
            Some(tree) => output.result(&render_tree(&tree, self.summaries)),
            None => output.warning("No sidebar fragments found"),
        }
        Ok(())
    }
}

/// Render the tree as an indented outline.
///
/// Each module lists its category groups (`[Structs] Oid, Timestamptz`)
/// before its child modules.
fn render_tree(tree: &NavigationTree, summaries: bool) -> String {
    let mut out = String::new();
    for child in tree.root().children() {
        render_node(&mut out, child, 0, summaries);
    }
    out
}

fn render_node(out: &mut String, node: &NavNode, depth: usize, summaries: bool) {
    let indent = INDENT.repeat(depth);
    let _ = writeln!(out, "{indent}{}", node.segment());

    if let Some(listing) = node.module() {
        for group in listing.groups() {
            if summaries {
                let _ = writeln!(out, "{indent}{INDENT}[{}]", group.title());
                for item in group.items() {
                    if item.summary.is_empty() {
                        let _ = writeln!(out, "{indent}{INDENT}{INDENT}{}", item.name);
                    } else {
                        let _ = writeln!(
                            out,
                            "{indent}{INDENT}{INDENT}{}: {}",
                            item.name, item.summary
                        );
                    }
                }
            } else {
                let names: Vec<_> = group.items().iter().map(|i| i.name.as_str()).collect();
                let _ = writeln!(
                    out,
                    "{indent}{INDENT}[{}] {}",
                    group.title(),
                    names.join(", ")
                );
            }
        }
    }

    for child in node.children() {
        render_node(out, child, depth + 1, summaries);
    }
}
