use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

use super::Context;

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: String,
    written: bool,
    config: &'a Config,
}

pub(super) fn run_config(ctx: &Context, write: bool) -> Result<()> {
    if write {
        ctx.config.save(&ctx.config_path)?;
        tracing::debug!(path = %ctx.config_path.display(), "wrote config");
    }

    let header = if write {
        format!("Wrote {}", ctx.config_path.display())
    } else {
        format!("# {}", ctx.config_path.display())
    };
    let mut human = HumanOutput::new(header);
    for line in ctx.config.to_toml()?.lines() {
        human.push_detail(line);
    }

    let report = ConfigReport {
        path: ctx.config_path.display().to_string(),
        written: write,
        config: &ctx.config,
    };
    emit_success(ctx.options, "config", &report, Some(&human))
}
