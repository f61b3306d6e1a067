use super::super::{Ctx, ModifyArgs};
use crate::Result;
use crate::core::ContactPatch;

pub(crate) fn handle(ctx: &Ctx, args: ModifyArgs) -> Result<()> {
    let patch = ContactPatch::from(args);
    let mut store = ctx.open_store()?;
    let indices = ctx.select(&store);
    let updated = store.modify(&indices, &patch)?;
    tracing::debug!(count = updated.len(), "contacts modified");
    Ok(())
}
