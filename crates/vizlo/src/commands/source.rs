//! Source command handlers.

use tabled::Tabled;
use vizlo_core::{Controller, Options, SelectOption, Source, SourceOptions};

use crate::cli::{GlobalOpts, SourceArgs, SourceCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Active")]
    active: String,
}

fn list(
    controller: &Controller,
    options: &SourceOptions,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let sources: Vec<Source> = match options {
        SourceOptions::Loaded(list) => list.sources(),
        SourceOptions::Unavailable { reason } => {
            return Err(CliError::Unavailable {
                reason: reason.clone(),
            });
        }
        SourceOptions::NotLoaded => {
            return Err(CliError::Unavailable {
                reason: "source options have not been loaded".into(),
            });
        }
    };
    let current = controller.source().current_option();
    let out = output::render_list(
        &global.output,
        &sources,
        |s| SourceRow {
            name: s.name.clone(),
            kind: s.kind.to_string(),
            active: if current.as_deref() == Some(s.name.as_str()) {
                "*".into()
            } else {
                String::new()
            },
        },
        |s| s.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SourceCommand::List => list(controller, &controller.source().options(), global),

        SourceCommand::Reload => {
            let options = controller.source().load().await;
            list(controller, &options, global)
        }

        SourceCommand::Current => {
            let current = controller.source().current_option();
            let label = |c: &Option<String>| c.clone().unwrap_or_else(|| "-".into());
            let out = output::render_single(&global.output, &current, label, label);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SourceCommand::Select { name } => {
            let ticket = controller.source().select_option(&name).await?;
            let snap = ticket.wait().await;
            if !global.quiet {
                match snap.current_source.as_deref() {
                    Some(now) if now != name => {
                        eprintln!("Requested {name}; television reports {now}");
                    }
                    _ => eprintln!("Switched to {name}"),
                }
            }
            Ok(())
        }
    }
}
