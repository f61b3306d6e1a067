use super::super::{AddArgs, Ctx};
use crate::Result;

pub(crate) fn handle(ctx: &Ctx, args: AddArgs) -> Result<()> {
    let mut store = ctx.open_store()?;
    let contact = store.add(args.into())?;
    tracing::debug!(uuid = %contact.uuid, "contact added");
    Ok(())
}
