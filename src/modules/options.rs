use crate::core::{Options, Theme};
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Slice, StoreModule};

pub const INIT_OPTIONS: &str = "initOptions";

/// Owns the chart options and the theme derived from them.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsModule;

impl StoreModule for OptionsModule {
    fn name(&self) -> &'static str {
        "options"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Options, Slice::Theme]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[INIT_OPTIONS]
    }

    fn reset_actions(&self) -> &'static [&'static str] {
        &[INIT_OPTIONS]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            INIT_OPTIONS => init_options(ctx),
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn init_options(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let options: Options = ctx.init().options.clone();
    let theme = Theme::from_options(&options.theme);
    ctx.set(options)?;
    ctx.set(theme)?;
    Ok(())
}
