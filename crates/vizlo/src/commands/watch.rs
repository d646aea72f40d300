//! `vizlo watch`: run the poll scheduler and print each published snapshot.

use std::fmt::Write as _;

use futures_util::StreamExt;
use vizlo_core::{Controller, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    controller: &Controller,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    controller.connect().await?;
    if !global.quiet {
        eprintln!(
            "Watching {} every {}s (Ctrl-C to stop)",
            controller.config().host,
            controller.config().poll_interval.as_secs()
        );
    }

    let color = output::should_color(&global.color);
    // Yields the connect-time snapshot first, then each later poll.
    let mut updates = controller.subscribe().into_stream();
    let mut seen = 0;
    loop {
        if args.count.is_some_and(|limit| seen >= limit) {
            break;
        }
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            next = updates.next() => {
                let Some(snap) = next else { break };
                print_snapshot(&snap, global, color);
                seen += 1;
            }
        }
    }

    controller.disconnect().await;
    Ok(())
}

fn print_snapshot(snap: &Snapshot, global: &GlobalOpts, color: bool) {
    let line = match global.output {
        // Streams as JSON lines regardless of pretty/compact.
        OutputFormat::Json | OutputFormat::JsonCompact => {
            output::render_single(&OutputFormat::JsonCompact, snap, |_| String::new(), |_| String::new())
        }
        OutputFormat::Yaml => format!(
            "---\n{}",
            output::render_single(&OutputFormat::Yaml, snap, |_| String::new(), |_| String::new())
        ),
        OutputFormat::Table | OutputFormat::Plain => summary(snap, color),
    };
    output::print_output(&line, global.quiet);
}

/// One line per snapshot: time, power, source, then every setting.
fn summary(snap: &Snapshot, color: bool) -> String {
    let time = snap
        .taken_at
        .map_or_else(|| "--:--:--".into(), |t| t.format("%H:%M:%S").to_string());
    let power = snap.power.map_or_else(
        || "?".into(),
        |p| output::paint_state(&p.to_string(), p == vizlo_core::PowerState::On, color),
    );
    let mut line = format!(
        "{time}  power={power}  source={}",
        snap.current_source.as_deref().unwrap_or("-")
    );
    for (key, reading) in &snap.settings {
        let _ = write!(line, "  {}={}", key.name, reading.value);
    }
    if snap.failed_reads > 0 {
        let _ = write!(line, "  ({} failed)", snap.failed_reads);
    }
    line
}
