use casebook_core::NoteChanges;

use crate::app::AppContext;
use crate::cli::{DeleteArgs, NoteAddArgs, NoteEditArgs, NoteShowArgs, NoteSubcommand, OutputArgs};
use crate::errors::CliError;
use crate::helpers::{confirm_delete, find_note, interactive, prompt_text};
use crate::ui::{
    blank_line, header, kv, print, print_json, short_id, single_line, truncate, validate_format,
    Column, OutputMode,
};

use super::{print_cancelled, print_listing, print_receipt, stamp};

pub fn handle_note(ctx: &AppContext, command: &NoteSubcommand) -> anyhow::Result<()> {
    match command {
        NoteSubcommand::Add(args) => handle_add(ctx, args),
        NoteSubcommand::List(args) => handle_list(ctx, args),
        NoteSubcommand::Show(args) => handle_show(ctx, args),
        NoteSubcommand::Edit(args) => handle_edit(ctx, args),
        NoteSubcommand::Delete(args) => handle_delete(ctx, args),
    }
}

fn handle_add(ctx: &AppContext, args: &NoteAddArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let content = match &args.content {
        Some(content) => content.clone(),
        None if interactive(args.no_input) => prompt_text("Content", None)?,
        None => {
            return Err(CliError::invalid_input("Note content is required")
                .with_hint("Pass --content")
                .into())
        }
    };

    let note = book.add_note(&args.title, &content)?;
    tracing::info!(id = %note.id, "note added");
    print_receipt(
        ctx,
        "Added note",
        &[("ID", short_id(&note.id).as_str()), ("Title", note.title.as_str())],
    );
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &OutputArgs) -> anyhow::Result<()> {
    validate_format(args.format.as_deref(), args.json)?;
    let book = ctx.open_casebook()?;
    let ui = ctx.ui_context(args);
    let notes = book.notes().list();

    if ui.mode.is_json() {
        return print_json(&notes);
    }

    let rows = notes
        .iter()
        .map(|note| -> anyhow::Result<Vec<String>> {
            let id = if ui.mode.is_pretty() {
                short_id(&note.id)
            } else {
                note.id.to_string()
            };
            Ok(vec![
                id,
                stamp(ctx, &ui, &note.created_at)?,
                truncate(&single_line(&note.title), 60),
            ])
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let columns = [Column::new("ID"), Column::new("Created"), Column::new("Title")];
    print_listing(&ui, "note list", &columns, &rows, "note");
    Ok(())
}

fn handle_show(ctx: &AppContext, args: &NoteShowArgs) -> anyhow::Result<()> {
    validate_format(args.output.format.as_deref(), args.output.json)?;
    let book = ctx.open_casebook()?;
    let note = find_note(&book, &args.id)?;
    let ui = ctx.ui_context(&args.output);

    match ui.mode {
        OutputMode::Json => print_json(note)?,
        OutputMode::Pretty => {
            print(&ui, &header(&ui, "note show", None));
            blank_line(&ui);
            print(&ui, &kv(&ui, "Title", &note.title));
            print(&ui, &kv(&ui, "ID", &note.id.to_string()));
            print(&ui, &kv(&ui, "Created", &stamp(ctx, &ui, &note.created_at)?));
            blank_line(&ui);
            print(&ui, &note.content);
        }
        OutputMode::Plain => {
            print(&ui, &kv(&ui, "ID", &note.id.to_string()));
            print(&ui, &kv(&ui, "Created", &stamp(ctx, &ui, &note.created_at)?));
            print(&ui, &kv(&ui, "Title", &single_line(&note.title)));
            print(&ui, &kv(&ui, "Content", &single_line(&note.content)));
        }
    }
    Ok(())
}

fn handle_edit(ctx: &AppContext, args: &NoteEditArgs) -> anyhow::Result<()> {
    if args.title.is_none() && args.content.is_none() {
        return Err(CliError::invalid_input("Nothing to change")
            .with_hint("Pass --title or --content")
            .into());
    }
    let mut book = ctx.open_casebook()?;
    let id = find_note(&book, &args.id)?.id;

    let note = book.edit_note(
        id,
        NoteChanges {
            title: args.title.clone(),
            content: args.content.clone(),
        },
    )?;
    print_receipt(
        ctx,
        "Updated note",
        &[("ID", short_id(&note.id).as_str()), ("Title", note.title.as_str())],
    );
    Ok(())
}

fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let mut book = ctx.open_casebook()?;
    let note = find_note(&book, &args.id)?;
    let (id, title) = (note.id, note.title.clone());

    if !confirm_delete(&format!("Delete note '{}'?", title), args.force)? {
        print_cancelled(ctx);
        return Ok(());
    }

    book.delete_note(id)?;
    tracing::info!(%id, "note deleted");
    print_receipt(ctx, "Deleted note", &[("ID", short_id(&id).as_str()), ("Title", title.as_str())]);
    Ok(())
}
