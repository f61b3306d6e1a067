use std::fs;

use super::super::{Ctx, ExportArgs, print_line};
use crate::Result;
use crate::store::{StoreError, to_json};

pub(crate) fn handle(ctx: &Ctx, args: ExportArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let indices = ctx.select(&store);
    let exported = store.export(&indices)?;
    let rendered = to_json(&exported)?;

    let Some(path) = args.output_file else {
        return print_line(rendered.trim_end());
    };
    fs::write(&path, rendered).map_err(|source| StoreError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(count = exported.len(), path = %path.display(), "contacts exported");
    Ok(())
}
