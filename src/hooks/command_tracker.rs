use ledger_core::markdown::fields;
use ledger_core::{transact, Result};

use super::HookContext;
use crate::models::{HookEvent, Tool, COMMANDS_RUN, CURRENT_SESSION};

pub(super) fn run(event: &HookEvent, ctx: &HookContext) -> Result<()> {
    if event.tool() != Some(Tool::Skill) {
        return Ok(());
    }
    let Some(skill) = event.skill() else {
        return Ok(());
    };

    let Some(root) = ctx.project_root(&ctx.event_dir(event)) else {
        tracing::debug!(skill, "no project root");
        return Ok(());
    };

    tracing::debug!(skill, "counting command");
    transact(ctx.store, &ctx.config.state_index_path(&root), |doc| {
        fields::increment(doc, CURRENT_SESSION, COMMANDS_RUN, 1)
    })?;

    Ok(())
}
