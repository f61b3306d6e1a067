use super::super::{Ctx, DeleteArgs};
use crate::Result;
use crate::prompt::StdinConfirm;
use crate::store::{DeleteOutcome, Document};

pub(crate) fn handle(ctx: &Ctx, args: DeleteArgs) -> Result<()> {
    let mut store = ctx.open_store()?;
    let indices = ctx.select(&store);
    // An explicit --backup target gets no snapshot.
    let backup = match args.backup {
        Some(_) => Document::new(&ctx.paths.deleted),
        None => ctx.deleted_document(),
    };

    match store.delete(&indices, &backup, &mut StdinConfirm)? {
        DeleteOutcome::Deleted(exiled) => {
            tracing::debug!(count = exiled.len(), "contacts deleted");
        }
        DeleteOutcome::Declined => {}
        DeleteOutcome::NothingSelected => eprintln!("no contacts selected"),
    }
    Ok(())
}
