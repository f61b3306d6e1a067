use super::super::{Ctx, ImportArgs};
use crate::Result;
use crate::store::audit::AUDIT_TARGET;
use crate::store::read_import_file;

pub(crate) fn handle(ctx: &Ctx, args: ImportArgs) -> Result<()> {
    let records = read_import_file(&args.input_file)?;
    let mut store = ctx.open_store()?;
    let report = store.import(records)?;
    tracing::info!(
        target: AUDIT_TARGET,
        added = report.added,
        skipped = report.skipped,
        "imported {} contact(s) from {}, skipped {} already known",
        report.added,
        args.input_file.display(),
        report.skipped
    );
    Ok(())
}
