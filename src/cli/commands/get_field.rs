use super::super::{Ctx, GetFieldArgs, print_lines};
use crate::Result;

pub(crate) fn handle(ctx: &Ctx, args: GetFieldArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let indices = ctx.select(&store);
    let values = store.get_field(&indices, &args.fieldname)?;
    print_lines(&values)
}
