use super::super::Ctx;
use crate::Result;
use crate::edit::ProcessEditor;

pub(crate) fn handle(ctx: &Ctx) -> Result<()> {
    let mut store = ctx.open_store()?;
    let indices = ctx.select(&store);
    let editor = ProcessEditor::new(ctx.config.editor.clone(), &ctx.paths.tmp_edit);
    let edited = store.edit(&indices, &editor)?;
    tracing::debug!(uuid = %edited.uuid, "contact edited");
    Ok(())
}
