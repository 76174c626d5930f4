//! Demo mode: the runner plays itself
//!
//! Used by the headless binary and attract screens. Jump at the end of the
//! current platform; dash when falling into a gap.

use super::state::RunState;
use super::tick::TickInput;

/// Seconds of run speed to look ahead when deciding to jump
const JUMP_LEAD: f32 = 0.08;
/// Minimum look-ahead in pixels
const JUMP_MARGIN: f32 = 8.0;

/// Overwrite the jump/dash commands in `input` for this tick
pub fn drive(state: &RunState, input: &mut TickInput) {
    let player = &state.player;

    if player.grounded {
        let ground_right = player
            .ground
            .and_then(|id| state.world.get(id))
            .map(|p| p.right());
        if let Some(right) = ground_right {
            let remaining = right - (player.pos.x + player.width);
            let lead = state.speed() * JUMP_LEAD + JUMP_MARGIN;
            input.jump = remaining < lead;
        }
        input.dash = false;
        return;
    }

    input.jump = false;
    let body = player.rect();
    let floor_below = state
        .world
        .platforms
        .iter()
        .any(|p| p.rect.overlaps_x(&body) && p.top() >= player.bottom());
    input.dash = player.vy > 0.0 && player.dash_ready && !floor_below;
}
