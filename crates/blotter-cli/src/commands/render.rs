//! `blotter render`: archive to styled document to the requested format.

use anyhow::Result;
use blotter_core::{Config, ContentFlag, ContentSelector, Entity, StyledDocument, TextRenderer};
use colored::control as color_control;
use std::time::Instant;
use tracing::{debug, info};

use crate::archive::{Archive, Selection};
use crate::cli::{ContentArg, RenderArgs};
use crate::output::{self, OutputFormat, detect};

/// Execute the render command.
pub fn execute(args: &RenderArgs, config: &Config, no_color: bool) -> Result<()> {
    let format = OutputFormat::resolve(args.format, args.output.is_some());
    output::check_destination(format, args.output.as_deref())?;

    // An explicit `--format ansi` colors even when piped
    if args.format == Some(OutputFormat::Ansi) && !no_color && detect::colors_allowed() {
        color_control::set_override(true);
    }

    let start = Instant::now();
    let archive = Archive::load(&args.input)?;
    let entities = archive.entities(selection(args));

    let document = render_document(&entities, args, config);
    debug!(
        entities = entities.len(),
        runs = document.runs().len(),
        elapsed_ms = start.elapsed().as_millis(),
        "rendered archive"
    );

    let bytes = format.encode(&document, config)?;
    output::write_output(args.output.as_deref(), &bytes)?;
    info!(?format, bytes = bytes.len(), "export complete");
    Ok(())
}

fn render_document(entities: &[Entity], args: &RenderArgs, config: &Config) -> StyledDocument {
    let mut render_config = config.render.clone();
    if let Some(color) = args.color {
        render_config.color = color.into();
    }
    let mut renderer = TextRenderer::from_config(&render_config);

    match args.content {
        ContentArg::Sharing => renderer.share(entities),
        ContentArg::All => {
            if entities.len() > render_config.prerender_threshold {
                renderer.prerender_response_bodies(entities);
            }
            renderer.render_entities(entities, all_sections(entities.len()))
        },
    }
}

const fn selection(args: &RenderArgs) -> Selection {
    if args.transactions {
        Selection::Transactions
    } else if args.tasks {
        Selection::Tasks
    } else {
        Selection::Messages
    }
}

/// Every section, with the compact header once there is more than one entity.
const fn all_sections(count: usize) -> ContentSelector {
    if count > 1 {
        ContentSelector::ALL
            .without(ContentFlag::LargeHeader)
            .with(ContentFlag::Header)
    } else {
        ContentSelector::ALL
    }
}
