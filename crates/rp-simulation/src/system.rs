use rp_core::CountryId;

use crate::context::SimContext;
use crate::error::SimResult;

/// One stage of the per-country tick pipeline.
///
/// Systems are executed in registration order for each live country, in
/// store order. A country annihilated part-way through its own pipeline
/// skips the remaining stages.
pub trait System: std::fmt::Debug + Send {
    /// Human-readable name for this system.
    fn name(&self) -> &str;

    /// Called once at the start of every tick, before any country is updated.
    fn begin_tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// Called once per live country per tick.
    fn update(&mut self, ctx: &mut SimContext<'_>, country: CountryId) -> SimResult<()>;
}
