use super::super::render;
use super::super::{Ctx, ShowArgs, print_lines};
use crate::Result;

pub(crate) fn handle(ctx: &Ctx, args: ShowArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let indices = ctx.select(&store);
    let matches = store.list_matches(&indices)?;

    let lines = render::render_table(&matches, args.color);
    let lines = match render::terminal_cutoff() {
        Some(cutoff) => render::truncate(lines, matches.len(), cutoff),
        None => lines,
    };
    print_lines(&lines)
}
